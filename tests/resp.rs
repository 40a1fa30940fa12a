use respb::resp_ref::{ClientState, RespOutcome};

#[test]
fn parse_ping_set_get_pipeline() {
    let mut client = ClientState::new();
    client.feed(b"*1\r\n$4\r\nPING\r\n");
    client.feed(b"*3\r\n$3\r\nSET\r\n$1\r\na\r\n$1\r\n1\r\n");
    client.feed(b"*2\r\n$3\r\nGET\r\n$1\r\na\r\n");

    let mut commands = Vec::new();
    loop {
        match client.parse_command().unwrap() {
            RespOutcome::Complete(argv) => commands.push(argv),
            RespOutcome::Incomplete => break,
        }
    }

    assert_eq!(commands.len(), 3);
    assert_eq!(&commands[0][0][..], b"PING");
    assert_eq!(&commands[1][0][..], b"SET");
    assert_eq!(&commands[1][1][..], b"a");
    assert_eq!(&commands[1][2][..], b"1");
    assert_eq!(&commands[2][0][..], b"GET");
    assert_eq!(&commands[2][1][..], b"a");
}

#[test]
fn incremental_feed_across_reads() {
    let mut client = ClientState::new();
    client.feed(b"*2\r\n$3\r\nGET");
    assert!(matches!(client.parse_command().unwrap(), RespOutcome::Incomplete));
    client.feed(b"\r\n$5\r\nmykey\r\n");
    match client.parse_command().unwrap() {
        RespOutcome::Complete(argv) => {
            assert_eq!(&argv[0][..], b"GET");
            assert_eq!(&argv[1][..], b"mykey");
        }
        RespOutcome::Incomplete => panic!("expected complete"),
    }
}

#[test]
fn malformed_leading_byte_is_an_error() {
    let mut client = ClientState::new();
    client.feed(b"not-a-multibulk\r\n");
    assert!(client.parse_command().is_err());
}
