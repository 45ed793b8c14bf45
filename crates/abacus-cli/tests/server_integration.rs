//! Integration tests for JSON-RPC server mode
//!
//! These drive the real binary the way an embedding tool would: one request
//! per line on stdin, one response per line on stdout.

use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::process::{Command, Stdio};

/// Helper to send a JSON-RPC request and get response
fn send_request(stdin: &mut impl Write, stdout: &mut impl BufRead, request: Value) -> Value {
    writeln!(stdin, "{}", request).unwrap();
    stdin.flush().unwrap();

    let mut response = String::new();
    stdout.read_line(&mut response).unwrap();
    serde_json::from_str(&response).unwrap()
}

fn request(method: &str, params: Value, id: u32) -> Value {
    json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": id
    })
}

/// Helper to extract result from response
fn get_result(response: &Value) -> &Value {
    response.get("result").expect("expected result in response")
}

fn get_display(response: &Value) -> &str {
    get_result(response)
        .get("display")
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

/// Spawn server process with no persistence
fn spawn_server() -> std::process::Child {
    Command::new(env!("CARGO_BIN_EXE_abacus"))
        .args(["--server", "--mode", "anonymous"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("failed to spawn server")
}

/// Test: expression typed character by character, as a launcher would send it
#[test]
fn test_incremental_expression() {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let keystrokes = ["2", "2 ", "2 +", "2 + ", "2 + 3", "2 + 3 *", "2 + 3 * 4"];

    for (i, partial) in keystrokes.iter().enumerate() {
        let response = send_request(
            &mut stdin,
            &mut stdout,
            request("evaluate", json!({"expr": partial}), i as u32),
        );
        assert_eq!(response["id"], i as u32);

        match *partial {
            "2" => assert_eq!(get_display(&response), "2"),
            "2 +" | "2 + 3 *" => assert_eq!(get_result(&response)["type"], "error"),
            "2 + 3 * 4" => assert_eq!(get_display(&response), "14"),
            _ => {}
        }
    }

    drop(stdin);
    child.wait().unwrap();
}

/// Test: keypad session keeps state across requests
#[test]
fn test_keypad_session() {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("press", json!({"keys": "3 + 4"}), 1),
    );
    assert_eq!(get_display(&response), "4");
    assert_eq!(get_result(&response)["pending"], "3 +");

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("press", json!({"keys": "+ 5 ="}), 2),
    );
    assert_eq!(get_display(&response), "12");

    let response = send_request(&mut stdin, &mut stdout, request("history", json!({}), 3));
    let history = get_result(&response).as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["expression"], "7 + 5");
    assert_eq!(history[1]["expression"], "3 + 4");

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("history", json!({"limit": 1}), 4),
    );
    assert_eq!(get_result(&response).as_array().unwrap().len(), 1);

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("recall", json!({"index": 1}), 7),
    );
    assert_eq!(get_display(&response), "7");

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("press", json!({"keys": "* 2 ="}), 8),
    );
    assert_eq!(get_display(&response), "14");

    send_request(&mut stdin, &mut stdout, request("clear_history", json!(null), 5));
    let response = send_request(&mut stdin, &mut stdout, request("history", json!(null), 6));
    assert!(get_result(&response).as_array().unwrap().is_empty());

    drop(stdin);
    child.wait().unwrap();
}

/// Test: divide by zero shows the error display and clear recovers
#[test]
fn test_error_recovery() {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("press", json!({"keys": "5 / 0 ="}), 1),
    );
    assert_eq!(get_display(&response), "Error");
    assert_eq!(get_result(&response)["is_error"], true);

    let response = send_request(&mut stdin, &mut stdout, request("clear", json!(null), 2));
    assert_eq!(get_display(&response), "0");
    assert_eq!(get_result(&response)["is_error"], false);

    drop(stdin);
    child.wait().unwrap();
}

/// Test: conversion methods
#[test]
fn test_conversion() {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request(
            "convert",
            json!({"category": "length", "from": "mile", "to": "km", "value": 100}),
            1,
        ),
    );
    assert_eq!(get_display(&response), "160.93");

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request(
            "convert",
            json!({"category": "temperature", "from": "celsius", "to": "kelvin", "value": 0}),
            2,
        ),
    );
    assert_eq!(get_result(&response)["value"], 273.15);

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request(
            "convert",
            json!({"category": "length", "from": "bogus", "to": "m", "value": 1}),
            3,
        ),
    );
    assert_eq!(get_result(&response)["message"], "Invalid unit: bogus");

    let response = send_request(&mut stdin, &mut stdout, request("categories", json!(null), 4));
    assert_eq!(get_result(&response).as_array().unwrap().len(), 10);

    let response = send_request(
        &mut stdin,
        &mut stdout,
        request("units", json!({"category": "data"}), 5),
    );
    let units = get_result(&response).as_array().unwrap();
    assert_eq!(units[0]["name"], "bit");
    assert_eq!(units[0]["label"], "Bit (b)");

    drop(stdin);
    child.wait().unwrap();
}

/// Test: protocol errors keep the server alive
#[test]
fn test_protocol_errors() {
    let mut child = spawn_server();
    let mut stdin = child.stdin.take().unwrap();
    let mut stdout = BufReader::new(child.stdout.take().unwrap());

    writeln!(stdin, "not json").unwrap();
    stdin.flush().unwrap();
    let mut line = String::new();
    stdout.read_line(&mut line).unwrap();
    let response: Value = serde_json::from_str(&line).unwrap();
    assert_eq!(response["error"]["code"], -32700);

    let response = send_request(&mut stdin, &mut stdout, request("eval", json!({}), 1));
    assert_eq!(response["error"]["code"], -32601);

    let response = send_request(&mut stdin, &mut stdout, request("press", json!({}), 2));
    assert_eq!(response["error"]["code"], -32602);

    // still answering
    let response = send_request(&mut stdin, &mut stdout, request("state", json!(null), 3));
    assert_eq!(get_display(&response), "0");

    drop(stdin);
    child.wait().unwrap();
}
