//! End-to-end tests: real sockets against a listener bound to an ephemeral
//! port, asserting on the capture files handlers leave behind.

use std::fs;
use std::io::{Read, Write};
use std::net::TcpStream;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};
use tcplog::config::Config;
use tcplog::server::{Server, capture_filename};
use tcplog::sink::SinkRegistry;
use tempfile::TempDir;

/// Handlers declare a burst finished after one second of idle; tests must wait
/// past that boundary to observe the emitted record.
const IDLE_GAP: Duration = Duration::from_millis(2000);

fn start_server(captures: &Path, address: &str, max_connections: usize) -> Server {
    let mut config = Config::default();
    config.server.address = address.to_string();
    config.server.port = 0;
    config.server.max_connections = max_connections;
    config.file.directory = captures.to_string_lossy().into_owned();

    // No sinks registered: connection chatter stays out of test output
    let mut server = Server::new(&config, SinkRegistry::new());
    server.start().unwrap();
    server
}

fn wait_until(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        thread::sleep(Duration::from_millis(50));
    }
    condition()
}

fn capture_lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path).map_or_else(
        |_| Vec::new(),
        |content| content.lines().map(str::to_string).collect(),
    )
}

#[test]
fn filename_replaces_dots_with_underscores() {
    assert_eq!(
        capture_filename("192.168.1.10".parse().unwrap()),
        "192_168_1_10.log"
    );
}

#[test]
fn filename_handles_ipv6_colons() {
    assert_eq!(capture_filename("::1".parse().unwrap()), "__1.log");
}

#[test]
fn start_is_idempotent_and_stop_is_final() {
    let tmp = TempDir::new().unwrap();
    let mut server = start_server(tmp.path(), "127.0.0.1", 4);

    assert!(server.is_running());
    let addr = server.local_addr().unwrap();

    // Second start is a no-op by run-state check: same socket, same address
    server.start().unwrap();
    assert_eq!(server.local_addr(), Some(addr));

    server.stop();
    assert!(!server.is_running());
    assert_eq!(server.local_addr(), None);

    // A stopped server can come back up on a fresh socket
    server.start().unwrap();
    assert!(server.is_running());
}

#[test]
fn two_bursts_become_two_records() {
    let tmp = TempDir::new().unwrap();
    let server = start_server(tmp.path(), "127.0.0.1", 4);
    let addr = server.local_addr().unwrap();

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(b"hello").unwrap();
    thread::sleep(IDLE_GAP);
    stream.write_all(b"world").unwrap();
    drop(stream);

    let path = tmp.path().join("127_0_0_1.log");
    assert!(wait_until(Duration::from_secs(3), || capture_lines(&path)
        .len()
        == 2));
    assert_eq!(capture_lines(&path), vec!["[INFO] hello", "[INFO] world"]);
}

#[test]
fn writes_within_one_idle_window_concatenate() {
    let tmp = TempDir::new().unwrap();
    let server = start_server(tmp.path(), "127.0.0.1", 4);
    let addr = server.local_addr().unwrap();

    let mut stream = TcpStream::connect(addr).unwrap();
    stream.write_all(b"foo").unwrap();
    thread::sleep(Duration::from_millis(100));
    stream.write_all(b"bar").unwrap();
    drop(stream);

    let path = tmp.path().join("127_0_0_1.log");
    assert!(wait_until(Duration::from_secs(3), || !capture_lines(&path)
        .is_empty()));
    assert_eq!(capture_lines(&path), vec!["[INFO] foobar"]);
}

#[test]
fn zero_byte_disconnect_still_logs_one_empty_record() {
    let tmp = TempDir::new().unwrap();
    let server = start_server(tmp.path(), "127.0.0.1", 4);
    let addr = server.local_addr().unwrap();

    let stream = TcpStream::connect(addr).unwrap();
    drop(stream);

    let path = tmp.path().join("127_0_0_1.log");
    assert!(wait_until(Duration::from_secs(3), || path.exists()));
    assert_eq!(fs::read_to_string(&path).unwrap(), "[INFO] \n");
}

#[test]
fn peers_never_share_a_capture_file() {
    let tmp = TempDir::new().unwrap();
    let server = start_server(tmp.path(), "0.0.0.0", 4);
    let port = server.local_addr().unwrap().port();

    // Loopback aliases give each client a distinct source address on Linux;
    // bind the second client explicitly since kernel source selection may
    // otherwise pick 127.0.0.1 for both connections
    let mut first = TcpStream::connect(("127.0.0.1", port)).unwrap();
    let second_socket =
        socket2::Socket::new(socket2::Domain::IPV4, socket2::Type::STREAM, None).unwrap();
    second_socket
        .bind(&std::net::SocketAddr::from(([127, 0, 0, 2], 0)).into())
        .unwrap();
    second_socket
        .connect(&std::net::SocketAddr::from(([127, 0, 0, 1], port)).into())
        .unwrap();
    let mut second = TcpStream::from(second_socket);
    first.write_all(b"from one").unwrap();
    second.write_all(b"from two").unwrap();
    drop(first);
    drop(second);

    let one = tmp.path().join("127_0_0_1.log");
    let two = tmp.path().join("127_0_0_2.log");
    assert!(wait_until(Duration::from_secs(3), || {
        one.exists() && two.exists()
    }));
    assert_eq!(capture_lines(&one), vec!["[INFO] from one"]);
    assert_eq!(capture_lines(&two), vec!["[INFO] from two"]);
}

#[test]
fn connection_ceiling_drops_the_excess_peer() {
    let tmp = TempDir::new().unwrap();
    let server = start_server(tmp.path(), "127.0.0.1", 1);
    let addr = server.local_addr().unwrap();

    let _kept = TcpStream::connect(addr).unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        server.active_connections() == 1
    }));

    let mut dropped = TcpStream::connect(addr).unwrap();
    dropped
        .set_read_timeout(Some(Duration::from_secs(3)))
        .unwrap();
    let mut buf = [0u8; 8];
    // The listener closes the excess connection without spawning a handler
    assert!(matches!(dropped.read(&mut buf), Ok(0) | Err(_)));
    assert_eq!(server.active_connections(), 1);
}

#[test]
fn stop_signals_running_handlers() {
    let tmp = TempDir::new().unwrap();
    let mut server = start_server(tmp.path(), "127.0.0.1", 4);
    let addr = server.local_addr().unwrap();

    let _stream = TcpStream::connect(addr).unwrap();
    assert!(wait_until(Duration::from_secs(2), || {
        server.active_connections() == 1
    }));

    server.stop();
    // Handlers observe the shutdown flag at their next idle poll
    assert!(wait_until(Duration::from_secs(3), || {
        server.active_connections() == 0
    }));
}

#[test]
fn erase_first_starts_each_session_fresh() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("127_0_0_1.log");
    fs::write(&path, "[INFO] stale session\n").unwrap();

    let mut config = Config::default();
    config.server.address = "127.0.0.1".to_string();
    config.server.port = 0;
    config.file.directory = tmp.path().to_string_lossy().into_owned();
    config.file.erase_first = true;
    let mut server = Server::new(&config, SinkRegistry::new());
    server.start().unwrap();

    let mut stream = TcpStream::connect(server.local_addr().unwrap()).unwrap();
    stream.write_all(b"new").unwrap();
    drop(stream);

    assert!(wait_until(Duration::from_secs(3), || {
        capture_lines(&path) == ["[INFO] new"]
    }));
}

#[test]
fn timestamped_captures_prefix_each_burst() {
    let tmp = TempDir::new().unwrap();

    let mut config = Config::default();
    config.server.address = "127.0.0.1".to_string();
    config.server.port = 0;
    config.file.directory = tmp.path().to_string_lossy().into_owned();
    config.file.timestamps = true;
    let mut server = Server::new(&config, SinkRegistry::new());
    server.start().unwrap();

    let mut stream = TcpStream::connect(server.local_addr().unwrap()).unwrap();
    stream.write_all(b"stamped").unwrap();
    drop(stream);

    let path = tmp.path().join("127_0_0_1.log");
    assert!(wait_until(Duration::from_secs(3), || path.exists()));
    let lines = capture_lines(&path);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with('('), "got: {}", lines[0]);
    assert!(lines[0].ends_with(") stamped"), "got: {}", lines[0]);
}
