//! Process-level startup behaviour of the `devserve` binary.

use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

#[test]
fn exits_with_failure_when_port_is_taken() {
    // If something else already holds port 8000 the binary must fail all the same.
    let _occupied = std::net::TcpListener::bind("0.0.0.0:8000").ok();

    let mut child = Command::new(env!("CARGO_BIN_EXE_devserve"))
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    let deadline = Instant::now() + Duration::from_secs(10);
    let status = loop {
        if let Some(status) = child.try_wait().unwrap() {
            break status;
        }
        if Instant::now() >= deadline {
            child.kill().unwrap();
            child.wait().unwrap();
            panic!("server started on an occupied port");
        }
        std::thread::sleep(Duration::from_millis(50));
    };

    let output = child.wait_with_output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!status.success());
    assert!(stderr.contains("[ERROR] Failed to bind 0.0.0.0:8000"), "{stderr}");
    assert!(!String::from_utf8_lossy(&output.stdout).contains("Serving at"));
}
