//! 客户列表状态切片
//!
//! 状态持有当前页数据与查询参数（页码/每页条数/排序/搜索词），外加每类
//! 操作各自的在途标志。归约规则：
//! - 每个操作是 "请求 -> 成功/失败" 的标志循环，失败记录错误消息
//! - 成功的变更（新建/更新/删除）不就地改写列表，由 store 重新加载当前页
//! - 删除被后端以 409 拒绝时列表保持原样，错误消息原文展示
//! - 搜索词变化时页码归零；排序切换遵循 `SortSpec::toggled`

use leptos::prelude::*;
use leptos::task::spawn_local;

use fabriq_shared::delivery::{Customer, CustomerRequest};
use fabriq_shared::{PageQuery, PageResponse};

use crate::api::{ApiError, CustomerApi};

// =========================================================
// 状态 (State)
// =========================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CustomerState {
    /// 当前页的客户
    pub customers: Vec<Customer>,
    /// 详情页选中的客户
    pub selected: Option<Customer>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// 最近一次成功或在途查询的参数
    pub query: PageQuery,
    // --- 在途标志，每类操作一个 ---
    pub loading: bool,
    pub loading_selected: bool,
    pub creating: bool,
    pub updating: bool,
    pub deleting: bool,
    /// 最近一次失败的用户可读消息
    pub error: Option<String>,
}

impl CustomerState {
    pub fn is_mutating(&self) -> bool {
        self.creating || self.updating || self.deleting
    }
}

// =========================================================
// 意图 (Intent)
// =========================================================

/// 状态切片接受的全部事件
#[derive(Debug, Clone, PartialEq)]
pub enum CustomerIntent {
    SearchRequested(PageQuery),
    SearchSucceeded(PageResponse<Customer>),
    SearchFailed(String),

    DetailRequested,
    DetailSucceeded(Customer),
    DetailFailed(String),

    CreateRequested,
    CreateSucceeded,
    CreateFailed(String),

    UpdateRequested,
    UpdateSucceeded(Customer),
    UpdateFailed(String),

    DeleteRequested,
    DeleteSucceeded(i64),
    DeleteFailed(String),

    ErrorDismissed,
}

// =========================================================
// 归约 (Reduce)
// =========================================================

/// 纯归约函数：同一状态应用同一意图永远得到同一结果
pub fn reduce(state: &CustomerState, intent: CustomerIntent) -> CustomerState {
    let mut next = state.clone();
    match intent {
        CustomerIntent::SearchRequested(query) => {
            next.loading = true;
            next.error = None;
            next.query = query;
        }
        CustomerIntent::SearchSucceeded(page) => {
            next.loading = false;
            next.customers = page.content;
            next.total_elements = page.total_elements;
            next.total_pages = page.total_pages;
            // 服务端可能钳制越界页码，以回传值为准
            next.query.page = page.page;
        }
        CustomerIntent::SearchFailed(message) => {
            next.loading = false;
            next.error = Some(message);
        }

        CustomerIntent::DetailRequested => {
            next.loading_selected = true;
            next.selected = None;
            next.error = None;
        }
        CustomerIntent::DetailSucceeded(customer) => {
            next.loading_selected = false;
            next.selected = Some(customer);
        }
        CustomerIntent::DetailFailed(message) => {
            next.loading_selected = false;
            next.error = Some(message);
        }

        CustomerIntent::CreateRequested => {
            next.creating = true;
            next.error = None;
        }
        CustomerIntent::CreateSucceeded => {
            next.creating = false;
        }
        CustomerIntent::CreateFailed(message) => {
            next.creating = false;
            next.error = Some(message);
        }

        CustomerIntent::UpdateRequested => {
            next.updating = true;
            next.error = None;
        }
        CustomerIntent::UpdateSucceeded(customer) => {
            next.updating = false;
            // 详情页展示的是同一个客户时就地更新
            if next.selected.as_ref().map(|c| c.id) == Some(customer.id) {
                next.selected = Some(customer);
            }
        }
        CustomerIntent::UpdateFailed(message) => {
            next.updating = false;
            next.error = Some(message);
        }

        CustomerIntent::DeleteRequested => {
            next.deleting = true;
            next.error = None;
        }
        CustomerIntent::DeleteSucceeded(id) => {
            next.deleting = false;
            next.customers.retain(|c| c.id != id);
            next.total_elements = next.total_elements.saturating_sub(1);
        }
        CustomerIntent::DeleteFailed(message) => {
            // 列表保持原样：被 409 拒绝的删除不得留下半成品状态
            next.deleting = false;
            next.error = Some(message);
        }

        CustomerIntent::ErrorDismissed => {
            next.error = None;
        }
    }
    next
}

// =========================================================
// Store：信号 + 副作用
// =========================================================

/// 客户切片的存取入口；克隆共享同一份信号
#[derive(Clone)]
pub struct CustomerStore {
    state: RwSignal<CustomerState>,
    api: CustomerApi,
}

impl CustomerStore {
    pub fn new(api: CustomerApi) -> Self {
        Self {
            state: RwSignal::new(CustomerState::default()),
            api,
        }
    }

    pub fn state(&self) -> RwSignal<CustomerState> {
        self.state
    }

    fn dispatch(&self, intent: CustomerIntent) {
        self.state.update(|s| *s = reduce(s, intent));
    }

    /// 加载一页；同一查询重复触发是幂等的
    pub fn load(&self, query: PageQuery) {
        self.dispatch(CustomerIntent::SearchRequested(query.clone()));
        let this = self.clone();
        spawn_local(async move {
            match this.api.search(&query).await {
                Ok(page) => this.dispatch(CustomerIntent::SearchSucceeded(page)),
                Err(e) => this.dispatch(CustomerIntent::SearchFailed(
                    e.user_message("Failed to load customers"),
                )),
            }
        });
    }

    /// 用当前查询参数重新加载（变更成功后的刷新）
    pub fn reload(&self) {
        self.load(self.state.get_untracked().query);
    }

    /// 搜索词变化：页码归零后加载
    pub fn set_search(&self, term: String) {
        let mut query = self.state.get_untracked().query;
        query.search = term;
        query.page = 0;
        self.load(query);
    }

    /// 表头点击：同字段翻转方向，新字段重置升序
    pub fn toggle_sort(&self, field: &str) {
        let mut query = self.state.get_untracked().query;
        query.sort = query.sort.toggled(field);
        query.page = 0;
        self.load(query);
    }

    pub fn go_to_page(&self, page: u32) {
        let mut query = self.state.get_untracked().query;
        query.page = page;
        self.load(query);
    }

    pub fn load_detail(&self, id: i64) {
        self.dispatch(CustomerIntent::DetailRequested);
        let this = self.clone();
        spawn_local(async move {
            match this.api.find_by_id(id).await {
                Ok(customer) => this.dispatch(CustomerIntent::DetailSucceeded(customer)),
                Err(e) => this.dispatch(CustomerIntent::DetailFailed(
                    e.user_message("Failed to load customer"),
                )),
            }
        });
    }

    /// 新建成功后重新加载当前页；`on_done(Ok)` 供界面关闭表单/弹提示
    pub fn create(&self, request: CustomerRequest, on_done: impl Fn(Result<(), ApiError>) + 'static) {
        self.dispatch(CustomerIntent::CreateRequested);
        let this = self.clone();
        spawn_local(async move {
            match this.api.create(&request).await {
                Ok(_) => {
                    this.dispatch(CustomerIntent::CreateSucceeded);
                    this.reload();
                    on_done(Ok(()));
                }
                Err(e) => {
                    this.dispatch(CustomerIntent::CreateFailed(
                        e.user_message("Failed to create customer"),
                    ));
                    on_done(Err(e));
                }
            }
        });
    }

    pub fn update(
        &self,
        id: i64,
        request: CustomerRequest,
        on_done: impl Fn(Result<(), ApiError>) + 'static,
    ) {
        self.dispatch(CustomerIntent::UpdateRequested);
        let this = self.clone();
        spawn_local(async move {
            match this.api.update(id, &request).await {
                Ok(customer) => {
                    this.dispatch(CustomerIntent::UpdateSucceeded(customer));
                    this.reload();
                    on_done(Ok(()));
                }
                Err(e) => {
                    this.dispatch(CustomerIntent::UpdateFailed(
                        e.user_message("Failed to update customer"),
                    ));
                    on_done(Err(e));
                }
            }
        });
    }

    /// 删除；有活跃订单时后端以 409 拒绝，列表不变
    pub fn delete(&self, id: i64, on_done: impl Fn(Result<(), ApiError>) + 'static) {
        self.dispatch(CustomerIntent::DeleteRequested);
        let this = self.clone();
        spawn_local(async move {
            match this.api.delete(id).await {
                Ok(()) => {
                    this.dispatch(CustomerIntent::DeleteSucceeded(id));
                    this.reload();
                    on_done(Ok(()));
                }
                Err(e) => {
                    this.dispatch(CustomerIntent::DeleteFailed(
                        e.user_message("Failed to delete customer"),
                    ));
                    on_done(Err(e));
                }
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn customer(id: i64, name: &str) -> Customer {
        Customer {
            id,
            name: name.to_string(),
            address: "1 rue A".to_string(),
            city: "Lyon".to_string(),
            orders_count: 0,
            has_active_orders: false,
        }
    }

    fn page_of(customers: Vec<Customer>, total: u64) -> PageResponse<Customer> {
        PageResponse {
            content: customers,
            total_elements: total,
            total_pages: 1,
            page: 0,
        }
    }

    #[test]
    fn search_cycles_loading_flag() {
        let state = CustomerState::default();
        let loading = reduce(&state, CustomerIntent::SearchRequested(PageQuery::default()));
        assert!(loading.loading);
        assert_eq!(loading.error, None);

        let loaded = reduce(
            &loading,
            CustomerIntent::SearchSucceeded(page_of(vec![customer(1, "Dupont")], 1)),
        );
        assert!(!loaded.loading);
        assert_eq!(loaded.customers.len(), 1);
        assert_eq!(loaded.total_elements, 1);
    }

    #[test]
    fn reloading_the_same_page_is_idempotent() {
        let state = CustomerState::default();
        let page = page_of(vec![customer(1, "Dupont"), customer(2, "Martin")], 2);

        let once = reduce(&state, CustomerIntent::SearchSucceeded(page.clone()));
        let twice = reduce(&once, CustomerIntent::SearchSucceeded(page));
        assert_eq!(once, twice);
    }

    #[test]
    fn search_request_replaces_query_and_clears_error() {
        let mut state = CustomerState::default();
        state.error = Some("boom".to_string());

        let mut query = PageQuery::default();
        query.search = "dup".to_string();
        let next = reduce(&state, CustomerIntent::SearchRequested(query.clone()));
        assert_eq!(next.query, query);
        assert_eq!(next.error, None);
    }

    #[test]
    fn server_clamped_page_wins_over_requested_page() {
        let mut state = CustomerState::default();
        state.query.page = 9;

        let page = PageResponse {
            content: vec![customer(1, "Dupont")],
            total_elements: 1,
            total_pages: 1,
            page: 0,
        };
        let next = reduce(&state, CustomerIntent::SearchSucceeded(page));
        assert_eq!(next.query.page, 0);
    }

    #[test]
    fn blocked_delete_leaves_list_unchanged() {
        let mut state = CustomerState::default();
        state.customers = vec![customer(1, "Dupont"), customer(2, "Martin")];
        state.total_elements = 2;

        let pending = reduce(&state, CustomerIntent::DeleteRequested);
        assert!(pending.deleting);

        let failed = reduce(
            &pending,
            CustomerIntent::DeleteFailed("Customer has active orders".to_string()),
        );
        assert!(!failed.deleting);
        assert_eq!(failed.customers, state.customers);
        assert_eq!(failed.total_elements, 2);
        assert_eq!(
            failed.error.as_deref(),
            Some("Customer has active orders")
        );
    }

    #[test]
    fn successful_delete_removes_row() {
        let mut state = CustomerState::default();
        state.customers = vec![customer(1, "Dupont"), customer(2, "Martin")];
        state.total_elements = 2;

        let next = reduce(
            &reduce(&state, CustomerIntent::DeleteRequested),
            CustomerIntent::DeleteSucceeded(1),
        );
        assert_eq!(next.customers.len(), 1);
        assert_eq!(next.customers[0].id, 2);
        assert_eq!(next.total_elements, 1);
    }

    #[test]
    fn update_refreshes_selected_customer_only_on_id_match() {
        let mut state = CustomerState::default();
        state.selected = Some(customer(1, "Dupont"));

        let renamed = Customer {
            name: "Dupont SA".to_string(),
            ..customer(1, "Dupont")
        };
        let next = reduce(&state, CustomerIntent::UpdateSucceeded(renamed));
        assert_eq!(next.selected.as_ref().unwrap().name, "Dupont SA");

        let other = reduce(&state, CustomerIntent::UpdateSucceeded(customer(9, "Autre")));
        assert_eq!(other.selected.as_ref().unwrap().name, "Dupont");
    }
}
