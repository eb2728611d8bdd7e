//! In-memory stand-in for the RPC service, mounted on a wiremock server.
//!
//! API keys are user names (`user1`, `user2`, ...). `demo-tpc-h` is a public
//! model visible to everyone. Generation methods answer `AI Response`.

#![allow(dead_code)]

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

use vanna_client::{RpcTransport, Session, VannaClient};
use vanna_common::{ModelName, Result};
use vanna_connectors::SqlRunner;
use vanna_protocol::DataFrame;

pub const DEMO_MODEL: &str = "demo-tpc-h";
pub const AI_RESPONSE: &str = "AI Response";
pub const NO_SQL: &str = "No SELECT statement could be found in the SQL code";

#[derive(Debug, Clone)]
struct Record {
    id: u64,
    kind: &'static str,
    question: Option<String>,
    content: String,
}

#[derive(Debug, Default)]
struct Model {
    members: BTreeSet<String>,
    admins: BTreeSet<String>,
    public: bool,
    records: Vec<Record>,
}

#[derive(Debug, Default)]
struct State {
    /// Creation order, so listings are stable.
    order: Vec<String>,
    models: HashMap<String, Model>,
    next_id: u64,
    calls: HashMap<String, usize>,
}

impl State {
    fn new() -> Self {
        let mut state = State::default();
        state.order.push(DEMO_MODEL.to_string());
        state.models.insert(
            DEMO_MODEL.to_string(),
            Model {
                public: true,
                ..Model::default()
            },
        );
        state
    }

    fn visible(&self, user: &str) -> Vec<String> {
        self.order
            .iter()
            .filter(|name| {
                let model = &self.models[name.as_str()];
                model.public || model.members.contains(user)
            })
            .cloned()
            .collect()
    }
}

/// Shared handle to the fake service state.
#[derive(Clone)]
pub struct FakeService {
    state: Arc<Mutex<State>>,
}

fn ok(result: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "result": result }))
}

fn status(success: bool) -> ResponseTemplate {
    ok(json!({"success": success, "message": ""}))
}

fn refused(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"error": {"code": -32000, "message": message}}))
}

fn header(request: &Request, name: &str) -> Option<String> {
    request
        .headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn table(columns: &[&str], rows: Vec<Vec<Value>>) -> Value {
    if rows.is_empty() {
        return json!({"data": "{}"});
    }
    let df = DataFrame::new(columns.iter().map(|c| c.to_string()).collect(), rows);
    json!({"data": df.to_pandas_json().to_string()})
}

impl FakeService {
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(State::new())),
        }
    }

    /// Start a server routing `/rpc` to this service.
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/rpc"))
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }

    /// Number of times `method` was called.
    pub fn calls(&self, method: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.calls.get(method).copied().unwrap_or(0)
    }

    pub fn record_count(&self, model: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.models.get(model).map_or(0, |m| m.records.len())
    }

    fn handle(&self, user: &str, model: Option<&str>, method: &str, param: &Value) -> ResponseTemplate {
        let mut guard = self.state.lock().unwrap();
        let state = &mut *guard;
        *state.calls.entry(method.to_string()).or_default() += 1;

        let text = |key: &str| param.get(key).and_then(Value::as_str).unwrap_or_default().to_string();

        match method {
            "list_orgs" => return ok(json!({"organizations": state.visible(user)})),
            "create_org" => {
                let name = text("org_name");
                if state.models.contains_key(&name) {
                    return status(false);
                }
                let mut created = Model::default();
                created.members.insert(user.to_string());
                created.admins.insert(user.to_string());
                state.order.push(name.clone());
                state.models.insert(name, created);
                return status(true);
            }
            "add_user_to_org" => {
                let name = text("org_name");
                let member = text("email");
                let member = member.split('@').next().unwrap_or_default().to_string();
                let is_admin = param.get("is_admin").and_then(Value::as_bool).unwrap_or(false);
                return match state.models.get_mut(&name) {
                    Some(m) if m.admins.contains(user) => {
                        m.members.insert(member.clone());
                        if is_admin {
                            m.admins.insert(member);
                        }
                        status(true)
                    }
                    _ => refused("Not an admin of this model"),
                };
            }
            _ => {}
        }

        let Some(model_name) = model else {
            return refused("No model selected");
        };
        let next_id = state.next_id + 1;
        let Some(model) = state.models.get_mut(model_name) else {
            return refused("No such model");
        };
        let is_member = model.members.contains(user);
        let is_admin = model.admins.contains(user);

        match method {
            "update_org_visibility" => {
                if !is_admin {
                    return status(false);
                }
                model.public = param.get("visibility").and_then(Value::as_bool).unwrap_or(false);
                status(true)
            }
            "store_sql" | "store_ddl" | "store_documentation" => {
                if !is_member {
                    return refused("You do not have write access to this model");
                }
                let (kind, question, content) = match method {
                    "store_sql" => ("sql", Some(text("question")), text("sql")),
                    "store_ddl" => ("ddl", None, text("data")),
                    _ => ("documentation", None, text("data")),
                };
                let duplicate = model
                    .records
                    .iter()
                    .any(|r| r.kind == kind && r.question == question && r.content == content);
                if !duplicate {
                    model.records.push(Record {
                        id: next_id,
                        kind,
                        question,
                        content,
                    });
                    state.next_id = next_id;
                }
                status(true)
            }
            "remove_sql" => {
                let question = text("question");
                let before = model.records.len();
                model
                    .records
                    .retain(|r| !(r.kind == "sql" && r.question.as_deref() == Some(question.as_str())));
                status(is_member && model.records.len() < before)
            }
            "remove_training_data" => {
                let id = text("data");
                let before = model.records.len();
                if is_member {
                    model.records.retain(|r| r.id.to_string() != id);
                }
                status(model.records.len() < before)
            }
            "flag_sql_for_review" => status(is_member),
            "get_training_data" => {
                let rows = model
                    .records
                    .iter()
                    .map(|r| {
                        vec![
                            json!(r.id.to_string()),
                            json!(r.kind),
                            json!(r.question),
                            json!(r.content),
                        ]
                    })
                    .collect();
                ok(table(&["id", "training_data_type", "question", "content"], rows))
            }
            "get_all_questions" => {
                let rows = model
                    .records
                    .iter()
                    .filter(|r| r.kind == "sql")
                    .map(|r| vec![json!(r.id), json!(r.question), json!(r.content)])
                    .collect();
                ok(table(&["id", "question", "sql"], rows))
            }
            "get_related_training_data" => ok(json!({
                "questions": [{"question": "What is the total sales for each product?", "sql": "SELECT * FROM ..."}],
                "ddl": ["DDL here"],
                "documentation": ["Documentation here"]
            })),
            "get_accuracy_stats" => ok(json!({"num_questions": 0, "data": {}})),
            "generate_sql_from_question" => {
                ok(json!({"raw_answer": NO_SQL, "prefix": "", "postfix": "", "sql": NO_SQL}))
            }
            "generate_question" => ok(json!({"question": AI_RESPONSE})),
            "generate_meta_from_question" | "generate_explanation" => {
                ok(json!({"explanation": AI_RESPONSE}))
            }
            "generate_questions" | "generate_followup_questions" => {
                ok(json!({"questions": [AI_RESPONSE]}))
            }
            "generate_plotly_code" => ok(json!({"plotly_code": AI_RESPONSE})),
            other => refused(&format!("Unknown method {other}")),
        }
    }
}

impl Respond for FakeService {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let Some(user) = header(request, "Vanna-Key") else {
            return ResponseTemplate::new(401);
        };
        let model = header(request, "Vanna-Org");
        let Ok(body) = request.body_json::<Value>() else {
            return ResponseTemplate::new(400);
        };
        let method = body["method"].as_str().unwrap_or_default().to_string();
        let param = body["params"].get(0).cloned().unwrap_or(Value::Null);
        self.handle(&user, model.as_deref(), &method, &param)
    }
}

/// Client logged in as `user`, with no model selected.
pub fn client_for(server: &MockServer, user: &str) -> VannaClient {
    let transport = RpcTransport::new(&server.uri()).unwrap();
    VannaClient::new(transport, Session::with_api_key(user))
}

/// Client logged in as `user` with `model` preselected, skipping the
/// access check done by `set_model`.
pub fn client_with_model(server: &MockServer, user: &str, model: &str) -> VannaClient {
    let transport = RpcTransport::new(&server.uri()).unwrap();
    let mut session = Session::with_api_key(user);
    session.set_model(ModelName::parse(model).unwrap());
    VannaClient::new(transport, session)
}

/// Runner that always returns the same table.
pub struct FixedRunner(pub DataFrame);

#[async_trait]
impl SqlRunner for FixedRunner {
    fn dialect(&self) -> &'static str {
        "fixed"
    }

    async fn run_sql(&self, _sql: &str) -> Result<DataFrame> {
        Ok(self.0.clone())
    }
}

/// Remembers every statement it is asked to run.
#[derive(Default)]
pub struct RecordingRunner {
    pub statements: Mutex<Vec<String>>,
}

#[async_trait]
impl SqlRunner for RecordingRunner {
    fn dialect(&self) -> &'static str {
        "recording"
    }

    async fn run_sql(&self, sql: &str) -> Result<DataFrame> {
        self.statements.lock().unwrap().push(sql.to_string());
        Ok(students())
    }
}

pub fn students() -> DataFrame {
    DataFrame::from_columns([(
        "Name",
        vec![
            json!("John"),
            json!("Emma"),
            json!("Tom"),
            json!("Emily"),
            json!("Alex"),
        ],
    )])
}
