use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

use async_trait::async_trait;
use futures::executor::block_on;
use futures::future::join_all;

use fabriq_shared::{AuthResponse, PageQuery};

use crate::session::tests::{MemoryStore, TestClock, forge_token};
use crate::session::SessionStore;
use crate::web::{HttpClient, HttpError, HttpRequest, HttpResponse};

use super::{ApiCore, ApiError, CustomerApi};

const BASE: &str = "http://test";

// =========================================================
// Shared Mock Components
// =========================================================

/// A manually opened gate: futures awaiting it stay pending until `open()`
#[derive(Default)]
struct Gate {
    opened: Cell<bool>,
    wakers: RefCell<Vec<Waker>>,
}

impl Gate {
    fn open(&self) {
        self.opened.set(true);
        for waker in self.wakers.borrow_mut().drain(..) {
            waker.wake();
        }
    }
}

struct GateWait {
    gate: Rc<Gate>,
}

impl Future for GateWait {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.gate.opened.get() {
            Poll::Ready(())
        } else {
            self.gate.wakers.borrow_mut().push(cx.waker().clone());
            Poll::Pending
        }
    }
}

/// Opens the gate once `target` requests have been rejected with 401.
/// Runs inside the same `join_all` as the requests under test.
struct OpenAfterRejections {
    ctx: Rc<TestContext>,
    target: u32,
}

impl Future for OpenAfterRejections {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.ctx.unauthorized.get() >= self.target {
            self.ctx.refresh_gate.open();
            Poll::Ready(())
        } else {
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

enum RefreshOutcome {
    /// Issue a fresh token pair; subsequent requests must carry the new token
    Rotate,
    /// Reject the refresh call with the given status
    Fail(u16),
}

struct TestContext {
    /// Operation log to verify calling order and header placement
    log: RefCell<Vec<String>>,
    refresh_calls: Cell<u32>,
    unauthorized: Cell<u32>,
    /// The only bearer token the backend currently accepts
    valid_token: RefCell<String>,
    refresh_outcome: RefreshOutcome,
    /// When true, refresh responses are held until the gate opens
    gate_refresh: bool,
    refresh_gate: Rc<Gate>,
    /// Canned 200 bodies per path (after auth passes)
    routes: RefCell<HashMap<String, String>>,
    /// Canned error responses per path, served regardless of outcome
    error_routes: RefCell<HashMap<String, (u16, String)>>,
}

impl TestContext {
    fn new(valid_token: &str, refresh_outcome: RefreshOutcome, gate_refresh: bool) -> Rc<Self> {
        Rc::new(Self {
            log: RefCell::new(Vec::new()),
            refresh_calls: Cell::new(0),
            unauthorized: Cell::new(0),
            valid_token: RefCell::new(valid_token.to_string()),
            refresh_outcome,
            gate_refresh,
            refresh_gate: Rc::new(Gate::default()),
            routes: RefCell::new(HashMap::new()),
            error_routes: RefCell::new(HashMap::new()),
        })
    }

    fn route(&self, path: &str, body: &str) {
        self.routes
            .borrow_mut()
            .insert(path.to_string(), body.to_string());
    }

    fn error_route(&self, path: &str, status: u16, body: &str) {
        self.error_routes
            .borrow_mut()
            .insert(path.to_string(), (status, body.to_string()));
    }

    fn push_log(&self, msg: String) {
        self.log.borrow_mut().push(msg);
    }
}

struct MockHttpClient {
    ctx: Rc<TestContext>,
}

#[async_trait(?Send)]
impl HttpClient for MockHttpClient {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, HttpError> {
        let path = req.url.strip_prefix(BASE).unwrap_or(&req.url).to_string();
        let bare_path = path.split('?').next().unwrap_or(&path).to_string();
        let auth = req.headers.get("Authorization").cloned();

        self.ctx.push_log(format!(
            "{} {} auth={}",
            req.method.as_str(),
            bare_path,
            auth.as_deref().unwrap_or("-")
        ));

        if bare_path == "/api/auth/refresh" {
            self.ctx.refresh_calls.set(self.ctx.refresh_calls.get() + 1);
            if self.ctx.gate_refresh {
                GateWait {
                    gate: self.ctx.refresh_gate.clone(),
                }
                .await;
            }
            return match &self.ctx.refresh_outcome {
                RefreshOutcome::Rotate => {
                    let next = forge_token("admin", &["ROLE_ADMIN"], Some(10_000_000));
                    *self.ctx.valid_token.borrow_mut() = next.clone();
                    let body = serde_json::to_string(&AuthResponse {
                        access_token: next,
                        refresh_token: "refresh-2".to_string(),
                        expires_in: 900_000,
                        refresh_expires_in: 86_400_000,
                    })
                    .unwrap();
                    Ok(HttpResponse { status: 200, body })
                }
                RefreshOutcome::Fail(status) => Ok(HttpResponse {
                    status: *status,
                    body: "{}".to_string(),
                }),
            };
        }

        // 预设错误路由在鉴权之前生效，公开端点也能用
        if let Some((status, body)) = self.ctx.error_routes.borrow().get(&bare_path) {
            return Ok(HttpResponse {
                status: *status,
                body: body.clone(),
            });
        }

        let expected = format!("Bearer {}", self.ctx.valid_token.borrow());
        if auth.as_deref() != Some(expected.as_str()) {
            self.ctx.unauthorized.set(self.ctx.unauthorized.get() + 1);
            return Ok(HttpResponse {
                status: 401,
                body: String::new(),
            });
        }

        let body = self
            .ctx
            .routes
            .borrow()
            .get(&bare_path)
            .cloned()
            .unwrap_or_else(|| "{}".to_string());
        Ok(HttpResponse { status: 200, body })
    }
}

// =========================================================
// Fixtures
// =========================================================

const EMPTY_PAGE: &str = r#"{"content":[],"totalElements":0,"totalPages":0,"page":0}"#;

/// Session holding a stale access token and a live refresh token
fn stale_session() -> (SessionStore, String) {
    let clock = Rc::new(TestClock::at(0));
    let session = SessionStore::new(Rc::new(MemoryStore::default()), clock.clone());
    let stale = forge_token("admin", &["ROLE_ADMIN"], None);
    session.save_tokens(&AuthResponse {
        access_token: stale.clone(),
        refresh_token: "refresh-1".to_string(),
        expires_in: 10_000,
        refresh_expires_in: 1_000_000,
    });
    clock.advance(20_000);
    (session, stale)
}

fn fresh_session(token: &str) -> SessionStore {
    let session = SessionStore::new(
        Rc::new(MemoryStore::default()),
        Rc::new(TestClock::at(0)),
    );
    session.save_tokens(&AuthResponse {
        access_token: token.to_string(),
        refresh_token: "refresh-1".to_string(),
        expires_in: 900_000,
        refresh_expires_in: 86_400_000,
    });
    session
}

fn core_with(ctx: &Rc<TestContext>, session: SessionStore) -> Rc<ApiCore> {
    let http = Rc::new(MockHttpClient { ctx: ctx.clone() });
    Rc::new(ApiCore::new(BASE, http, session))
}

// =========================================================
// Tests
// =========================================================

#[test]
fn bearer_is_attached_to_authorized_requests() {
    let token = forge_token("admin", &["ROLE_ADMIN"], Some(10_000_000));
    let ctx = TestContext::new(&token, RefreshOutcome::Rotate, false);
    ctx.route("/api/customers", EMPTY_PAGE);
    let core = core_with(&ctx, fresh_session(&token));
    let api = CustomerApi::new(core);

    let page = block_on(api.search(&PageQuery::default())).unwrap();
    assert!(page.content.is_empty());

    let log = ctx.log.borrow();
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("GET /api/customers auth=Bearer "));
    assert_eq!(ctx.refresh_calls.get(), 0);
}

#[test]
fn stale_token_triggers_exactly_one_refresh_for_concurrent_requests() {
    let (session, _) = stale_session();
    let ctx = TestContext::new("unused-yet", RefreshOutcome::Rotate, false);
    ctx.route("/api/customers", EMPTY_PAGE);
    let core = core_with(&ctx, session.clone());
    let api = CustomerApi::new(core);

    // 会话在发送前就能发现过期：三个并发请求只允许一次刷新
    let query = PageQuery::default();
    let results = block_on(join_all(vec![
        api.search(&query),
        api.search(&query),
        api.search(&query),
    ]));

    assert!(results.iter().all(|r| r.is_ok()));
    assert_eq!(ctx.refresh_calls.get(), 1);
    assert!(session.is_authenticated());

    // 刷新调用本身绝不携带 Bearer 头
    let log = ctx.log.borrow();
    let refresh_line = log
        .iter()
        .find(|l| l.contains("/api/auth/refresh"))
        .unwrap();
    assert!(refresh_line.ends_with("auth=-"));

    // 三个请求都用同一个新令牌发出
    let expected = format!("Bearer {}", ctx.valid_token.borrow());
    let data_lines: Vec<_> = log.iter().filter(|l| l.contains("/api/customers")).collect();
    assert_eq!(data_lines.len(), 3);
    assert!(data_lines.iter().all(|l| l.contains(&expected)));
}

#[test]
fn concurrent_401s_share_one_inflight_refresh_and_replay() {
    // 会话自认为新鲜，但后端已拒绝其令牌：三个请求同时收到 401。
    // 刷新响应被闸门扣住，直到三个 401 全部发生，确保等待者真正并发。
    // 三个请求打不同的路径，以便核对各等待者重放的是自己的请求。
    let token = forge_token("admin", &["ROLE_ADMIN"], Some(10_000_000));
    let session = fresh_session(&token);
    let ctx = TestContext::new("rotated-away", RefreshOutcome::Rotate, true);
    for id in 1..=3 {
        ctx.route(
            &format!("/api/customers/{}", id),
            &format!(
                r#"{{"id":{},"name":"Customer {}","address":"1 rue Test","city":"Lyon"}}"#,
                id, id
            ),
        );
    }
    let core = core_with(&ctx, session);
    let api = CustomerApi::new(core);

    let opener = OpenAfterRejections {
        ctx: ctx.clone(),
        target: 3,
    };

    let (results, _) = block_on(futures::future::join(
        join_all(vec![
            api.find_by_id(1),
            api.find_by_id(2),
            api.find_by_id(3),
        ]),
        opener,
    ));

    // 每个等待者拿回的是自己请求的资源
    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.as_ref().unwrap().id, i as i64 + 1);
    }
    assert_eq!(ctx.refresh_calls.get(), 1);
    assert_eq!(ctx.unauthorized.get(), 3);

    // 每个请求恰好重放一次：3 次 401 + 3 次成功重放，
    // 且重放顺序与各请求被拒的顺序一致
    let log = ctx.log.borrow();
    let data_paths: Vec<&str> = log
        .iter()
        .filter(|l| l.contains("/api/customers/"))
        .map(|l| l.split_whitespace().nth(1).unwrap())
        .collect();
    assert_eq!(data_paths.len(), 6);
    let (rejected, replayed) = data_paths.split_at(3);
    assert_eq!(rejected, replayed);
}

#[test]
fn failed_refresh_fails_all_waiters_and_purges_session() {
    let token = forge_token("admin", &["ROLE_ADMIN"], Some(10_000_000));
    let session = fresh_session(&token);
    let ctx = TestContext::new("rotated-away", RefreshOutcome::Fail(401), true);
    let core = core_with(&ctx, session.clone());
    let api = CustomerApi::new(core);

    let query = PageQuery::default();
    let opener = OpenAfterRejections {
        ctx: ctx.clone(),
        target: 3,
    };

    let (results, _) = block_on(futures::future::join(
        join_all(vec![
            api.search(&query),
            api.search(&query),
            api.search(&query),
        ]),
        opener,
    ));

    assert_eq!(ctx.refresh_calls.get(), 1);
    for result in results {
        assert!(matches!(result, Err(ApiError::SessionExpired)));
    }
    assert_eq!(session.access_token(), None);
    assert_eq!(session.refresh_token(), None);
}

#[test]
fn conflict_delete_surfaces_backend_message_verbatim() {
    let token = forge_token("admin", &["ROLE_ADMIN"], Some(10_000_000));
    let ctx = TestContext::new(&token, RefreshOutcome::Rotate, false);
    ctx.error_route(
        "/api/customers/7",
        409,
        r#"{"message":"Customer has active orders"}"#,
    );
    let core = core_with(&ctx, fresh_session(&token));
    let api = CustomerApi::new(core);

    let err = block_on(api.delete(7)).unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(
        err.user_message("Delete failed"),
        "Customer has active orders"
    );
    assert_eq!(ctx.refresh_calls.get(), 0);
}

#[test]
fn forbidden_is_distinguished_from_conflict() {
    let token = forge_token("user", &["ROLE_USER"], Some(10_000_000));
    let ctx = TestContext::new(&token, RefreshOutcome::Rotate, false);
    ctx.error_route("/api/customers/7", 403, "{}");
    let core = core_with(&ctx, fresh_session(&token));
    let api = CustomerApi::new(core);

    let err = block_on(api.delete(7)).unwrap_err();
    assert!(err.is_forbidden());
}

#[test]
fn public_login_carries_no_bearer() {
    let ctx = TestContext::new("whatever", RefreshOutcome::Rotate, false);
    let session = SessionStore::new(
        Rc::new(MemoryStore::default()),
        Rc::new(TestClock::at(0)),
    );
    let core = core_with(&ctx, session);
    let api = super::AuthApi::new(core);

    // Login responses are canned per-path only after auth; the mock rejects
    // unauthenticated non-public paths, so register a route by making the
    // login path an error route served before the bearer check.
    ctx.error_route("/api/auth/login", 401, r#"{"message":"Bad credentials"}"#);
    let err = block_on(api.login(&fabriq_shared::LoginRequest {
        username: "x".to_string(),
        password: "y".to_string(),
    }))
    .unwrap_err();

    assert_eq!(err.user_message("Login failed"), "Bad credentials");
    let log = ctx.log.borrow();
    assert!(log[0].ends_with("auth=-"));
}
