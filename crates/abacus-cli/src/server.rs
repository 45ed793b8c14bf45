//! JSON-RPC 2.0 server mode for abacus
//!
//! Lets other tools use abacus as a calculation backend. Reads one request
//! per line from stdin and writes one response per line to stdout. The
//! server holds a single calculator session for keypad methods.

use abacus_core::{
    convert, evaluate, format_conversion, format_number, get_categories, Calculator, Category,
    HistoryEntry, Key,
};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, Write};

/// JSON-RPC 2.0 request
#[derive(Deserialize)]
struct Request {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<serde_json::Value>,
    id: serde_json::Value,
}

/// JSON-RPC 2.0 response
#[derive(Serialize)]
struct Response {
    jsonrpc: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<RpcError>,
    id: serde_json::Value,
}

/// JSON-RPC error object
#[derive(Serialize)]
struct RpcError {
    code: i32,
    message: String,
}

/// Outcome of an evaluation or conversion
#[derive(Serialize)]
struct ValueResult {
    #[serde(rename = "type")]
    result_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    display: String,
}

impl ValueResult {
    fn from_outcome(outcome: abacus_core::Result<f64>, render: fn(f64) -> String) -> Self {
        match outcome {
            Ok(value) => Self {
                result_type: "number",
                value: Some(value),
                message: None,
                display: render(value),
            },
            Err(e) => Self {
                result_type: "error",
                value: None,
                message: Some(e.to_string()),
                display: abacus_core::ERROR_DISPLAY.to_string(),
            },
        }
    }
}

/// Keypad session snapshot
#[derive(Serialize)]
struct StateResult<'a> {
    display: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pending: Option<String>,
    memory: String,
    is_error: bool,
}

#[derive(Serialize)]
struct UnitInfo {
    name: &'static str,
    label: &'static str,
}

#[derive(Deserialize)]
struct EvaluateParams {
    expr: String,
}

#[derive(Deserialize)]
struct ConvertParams {
    category: String,
    from: String,
    to: String,
    value: f64,
}

#[derive(Deserialize)]
struct UnitsParams {
    category: String,
}

/// Space-separated keypad keys, e.g. `"2 + 3 ="`
#[derive(Deserialize)]
struct PressParams {
    keys: String,
}

#[derive(Deserialize)]
struct RecallParams {
    index: usize,
}

#[derive(Deserialize, Default)]
struct HistoryParams {
    #[serde(default)]
    limit: Option<usize>,
}

// JSON-RPC error codes
const PARSE_ERROR: i32 = -32700;
const INVALID_REQUEST: i32 = -32600;
const METHOD_NOT_FOUND: i32 = -32601;
const INVALID_PARAMS: i32 = -32602;
const INTERNAL_ERROR: i32 = -32603;

impl Response {
    fn success(id: serde_json::Value, result: impl Serialize) -> Self {
        match serde_json::to_value(result) {
            Ok(result) => Self {
                jsonrpc: "2.0",
                result: Some(result),
                error: None,
                id,
            },
            Err(e) => Self::error(id, INTERNAL_ERROR, format!("Serialization failed: {e}")),
        }
    }

    fn error(id: serde_json::Value, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0",
            result: None,
            error: Some(RpcError {
                code,
                message: message.into(),
            }),
            id,
        }
    }
}

/// Deserialize required params or build the error response
fn parse_params<T: for<'de> Deserialize<'de>>(
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<T, Response> {
    match params {
        Some(p) => serde_json::from_value(p).map_err(|e| {
            Response::error(id.clone(), INVALID_PARAMS, format!("Invalid params: {e}"))
        }),
        None => Err(Response::error(id.clone(), INVALID_PARAMS, "Missing params")),
    }
}

/// Handle a single JSON-RPC request
fn handle_request(calc: &mut Calculator, input: &str) -> Response {
    let request: Request = match serde_json::from_str(input) {
        Ok(r) => r,
        Err(e) => {
            return Response::error(
                serde_json::Value::Null,
                PARSE_ERROR,
                format!("Parse error: {e}"),
            );
        }
    };

    if request.jsonrpc != "2.0" {
        return Response::error(request.id, INVALID_REQUEST, "Invalid JSON-RPC version");
    }

    tracing::debug!(method = %request.method, "request");

    let id = request.id;
    let params = request.params;
    let outcome = match request.method.as_str() {
        "evaluate" => handle_evaluate(&id, params),
        "convert" => handle_convert(&id, params),
        "units" => handle_units(&id, params),
        "categories" => Ok(Response::success(id.clone(), get_categories())),
        "press" => handle_press(calc, &id, params),
        "state" => Ok(Response::success(id.clone(), state(calc))),
        "history" => handle_history(calc, &id, params),
        "recall" => handle_recall(calc, &id, params),
        "clear_history" => {
            calc.clear_history();
            Ok(Response::success(id.clone(), serde_json::json!({"message": "History cleared"})))
        }
        "clear" => {
            calc.clear_all();
            Ok(Response::success(id.clone(), state(calc)))
        }
        other => Err(Response::error(
            id.clone(),
            METHOD_NOT_FOUND,
            format!("Method not found: {other}"),
        )),
    };

    outcome.unwrap_or_else(|response| response)
}

/// Evaluate an expression without touching the keypad session
fn handle_evaluate(
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: EvaluateParams = parse_params(id, params)?;
    let result = ValueResult::from_outcome(evaluate(&params.expr), format_number);
    Ok(Response::success(id.clone(), result))
}

fn handle_convert(
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: ConvertParams = parse_params(id, params)?;
    let outcome = convert(&params.category, &params.from, &params.to, params.value);
    let result = ValueResult::from_outcome(outcome, format_conversion);
    Ok(Response::success(id.clone(), result))
}

fn handle_units(
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: UnitsParams = parse_params(id, params)?;
    let category = Category::parse(&params.category).ok_or_else(|| {
        Response::error(
            id.clone(),
            INVALID_PARAMS,
            abacus_core::Error::UnknownCategory(params.category.clone()).to_string(),
        )
    })?;

    let units: Vec<UnitInfo> = category
        .def()
        .units
        .iter()
        .map(|u| UnitInfo {
            name: u.name,
            label: u.label,
        })
        .collect();
    Ok(Response::success(id.clone(), units))
}

/// Press keys on the session calculator. Keys are validated up front so an
/// unknown key leaves the session untouched.
fn handle_press(
    calc: &mut Calculator,
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: PressParams = parse_params(id, params)?;
    let keys = params
        .keys
        .split_whitespace()
        .map(str::parse::<Key>)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| Response::error(id.clone(), INVALID_PARAMS, e.to_string()))?;

    for key in keys {
        calc.press(key);
    }
    Ok(Response::success(id.clone(), state(calc)))
}

fn handle_history(
    calc: &Calculator,
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: HistoryParams = match params {
        Some(_) => parse_params(id, params)?,
        None => HistoryParams::default(),
    };

    let entries: &[HistoryEntry] = match params.limit {
        Some(limit) => calc.history().recent(limit),
        None => calc.history().entries(),
    };
    Ok(Response::success(id.clone(), entries))
}

/// Load a past result (0 is the most recent) as the current operand
fn handle_recall(
    calc: &mut Calculator,
    id: &serde_json::Value,
    params: Option<serde_json::Value>,
) -> Result<Response, Response> {
    let params: RecallParams = parse_params(id, params)?;
    calc.recall_history(params.index)
        .map_err(|e| Response::error(id.clone(), INVALID_PARAMS, e.to_string()))?;
    Ok(Response::success(id.clone(), state(calc)))
}

fn state(calc: &Calculator) -> StateResult<'_> {
    StateResult {
        display: calc.display(),
        pending: calc.pending_expression(),
        memory: format_number(calc.memory()),
        is_error: calc.is_error(),
    }
}

/// Run the JSON-RPC server loop
pub fn run_server(calc: &mut Calculator) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    tracing::info!("JSON-RPC server listening on stdin");

    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = handle_request(calc, &line);
        let json = serde_json::to_string(&response)?;
        writeln!(stdout, "{json}")?;
        stdout.flush()?;
    }

    tracing::info!("stdin closed, server exiting");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn call(calc: &mut Calculator, request: serde_json::Value) -> serde_json::Value {
        let response = handle_request(calc, &request.to_string());
        serde_json::to_value(response).unwrap()
    }

    #[test]
    fn test_evaluate() {
        let mut calc = Calculator::new();
        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "evaluate", "params": {"expr": "2 + 3 * 4"}, "id": 1}),
        );
        assert_eq!(
            response,
            json!({"jsonrpc": "2.0", "result": {"type": "number", "value": 14.0, "display": "14"}, "id": 1})
        );
    }

    #[test]
    fn test_evaluate_error_is_a_result() {
        let mut calc = Calculator::new();
        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "evaluate", "params": {"expr": "1 / 0"}, "id": 2}),
        );
        assert_eq!(response["result"]["type"], "error");
        assert_eq!(
            response["result"]["message"],
            "Invalid expression: Division by zero"
        );
    }

    #[test]
    fn test_press_and_state() {
        let mut calc = Calculator::new();
        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "press", "params": {"keys": "2 +"}, "id": 3}),
        );
        assert_eq!(response["result"]["display"], "2");
        assert_eq!(response["result"]["pending"], "2 +");

        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "press", "params": {"keys": "3 ="}, "id": 4}),
        );
        assert_eq!(response["result"]["display"], "5");
        assert!(response["result"].get("pending").is_none());
    }

    #[test]
    fn test_press_rejects_unknown_key_atomically() {
        let mut calc = Calculator::new();
        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "press", "params": {"keys": "7 sinh"}, "id": 5}),
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
        assert_eq!(calc.display(), "0");
    }

    #[test]
    fn test_recall() {
        let mut calc = Calculator::new();
        call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "press", "params": {"keys": "2 + 3 = AC"}, "id": 1}),
        );
        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "recall", "params": {"index": 0}, "id": 2}),
        );
        assert_eq!(response["result"]["display"], "5");

        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "press", "params": {"keys": "* 2 ="}, "id": 3}),
        );
        assert_eq!(response["result"]["display"], "10");

        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "recall", "params": {"index": 9}, "id": 4}),
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
        assert_eq!(response["error"]["message"], "No history entry at index 9");
    }

    #[test]
    fn test_protocol_errors() {
        let mut calc = Calculator::new();
        let response = serde_json::to_value(handle_request(&mut calc, "{not json")).unwrap();
        assert_eq!(response["error"]["code"], PARSE_ERROR);

        let response = call(
            &mut calc,
            json!({"jsonrpc": "1.0", "method": "state", "id": 6}),
        );
        assert_eq!(response["error"]["code"], INVALID_REQUEST);

        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "launch", "id": 7}),
        );
        assert_eq!(response["error"]["code"], METHOD_NOT_FOUND);

        let response = call(
            &mut calc,
            json!({"jsonrpc": "2.0", "method": "convert", "params": {"category": "length"}, "id": 8}),
        );
        assert_eq!(response["error"]["code"], INVALID_PARAMS);
    }
}
