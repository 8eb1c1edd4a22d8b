//! 分页与排序模型
//!
//! 对应后端 Spring 风格的分页响应；`SortSpec` 封装了 `"field,asc"` 形式的
//! 复合排序 token 及其切换规则。

use serde::{Deserialize, Serialize};

// =========================================================
// 分页响应 (Page Response)
// =========================================================

/// 后端分页响应的统一外形
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResponse<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    /// 服务端回传的实际页码（可能与请求值不同，如越界时被钳制）
    pub page: u32,
}

impl<T> Default for PageResponse<T> {
    fn default() -> Self {
        Self {
            content: Vec::new(),
            total_elements: 0,
            total_pages: 0,
            page: 0,
        }
    }
}

// =========================================================
// 排序 (Sort)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// 排序规格
///
/// 序列化为 `"field,direction"` 复合 token（查询参数格式）。
/// 切换规则：点击同一字段翻转方向，切换到新字段重置为升序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// 解析 `"field,asc"` token；缺失方向时默认升序
    pub fn parse(token: &str) -> Self {
        let mut parts = token.splitn(2, ',');
        let field = parts.next().unwrap_or_default().to_string();
        let direction = match parts.next() {
            Some("desc") => SortDirection::Desc,
            _ => SortDirection::Asc,
        };
        Self { field, direction }
    }

    pub fn token(&self) -> String {
        format!("{},{}", self.field, self.direction.as_str())
    }

    /// 应用一次表头点击
    pub fn toggled(&self, field: &str) -> Self {
        if self.field == field {
            Self {
                field: self.field.clone(),
                direction: self.direction.flipped(),
            }
        } else {
            Self::asc(field)
        }
    }

    pub fn is_field(&self, field: &str) -> bool {
        self.field == field
    }
}

// =========================================================
// 查询参数 (Page Query)
// =========================================================

/// 列表查询的完整参数集（页码从 0 开始）
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    pub sort: SortSpec,
    pub search: String,
}

impl PageQuery {
    /// 生成查询字符串（search 为空时省略）
    pub fn to_query_string(&self) -> String {
        let mut qs = format!(
            "page={}&size={}&sort={}",
            self.page,
            self.size,
            self.sort.token()
        );
        if !self.search.is_empty() {
            qs.push_str("&search=");
            qs.push_str(&urlencode(&self.search));
        }
        qs
    }
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: 0,
            size: 10,
            sort: SortSpec::asc("name"),
            search: String::new(),
        }
    }
}

/// 最小化的查询参数转义（空格与保留字符）
fn urlencode(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for b in s.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sort_toggle_same_field_flips_direction() {
        let sort = SortSpec::asc("name");
        let toggled = sort.toggled("name");
        assert_eq!(toggled.direction, SortDirection::Desc);
        assert_eq!(toggled.toggled("name").direction, SortDirection::Asc);
    }

    #[test]
    fn sort_toggle_new_field_resets_to_asc() {
        let sort = SortSpec {
            field: "name".to_string(),
            direction: SortDirection::Desc,
        };
        let toggled = sort.toggled("city");
        assert_eq!(toggled.field, "city");
        assert_eq!(toggled.direction, SortDirection::Asc);
    }

    #[test]
    fn sort_token_roundtrip() {
        assert_eq!(SortSpec::parse("name,desc").token(), "name,desc");
        assert_eq!(SortSpec::parse("name").token(), "name,asc");
    }

    #[test]
    fn query_string_includes_search_only_when_present() {
        let mut query = PageQuery::default();
        assert_eq!(query.to_query_string(), "page=0&size=10&sort=name,asc");

        query.search = "du pont".to_string();
        assert_eq!(
            query.to_query_string(),
            "page=0&size=10&sort=name,asc&search=du%20pont"
        );
    }

    #[test]
    fn page_response_deserializes_camel_case() {
        let json = r#"{"content":[1,2],"totalElements":12,"totalPages":2,"page":0}"#;
        let page: PageResponse<u32> = serde_json::from_str(json).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert_eq!(page.total_elements, 12);
        assert_eq!(page.total_pages, 2);
    }
}
