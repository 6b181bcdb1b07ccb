//! Response envelope and paging shapes used by every backend endpoint.

use serde::{Deserialize, Deserializer, Serialize};

/// Standard backend response wrapper: `{success, message, data, timestamp?}`.
///
/// `data` is absent on some mutation responses (e.g. activate/deactivate
/// return only a message), so it is optional here and callers decide whether
/// they need it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

/// A page of results in Spring's paging shape.
///
/// The users endpoint has shipped both as a paged object and as a bare
/// array; [`Page`] accepts either, treating an array as a single page.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u32,
    pub number: u32,
    pub size: u32,
}

impl<T> Page<T> {
    /// A single page holding every item.
    #[must_use]
    pub fn single(content: Vec<T>) -> Self {
        let len = content.len();
        Self {
            total_elements: len as u64,
            total_pages: u32::from(len > 0),
            number: 0,
            size: u32::try_from(len).unwrap_or(u32::MAX),
            content,
        }
    }

    /// Whether a page exists after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number + 1 < self.total_pages
    }

    /// Whether a page exists before this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 0
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PagedShape<T> {
    #[serde(default = "Vec::new")]
    content: Vec<T>,
    #[serde(default)]
    total_elements: Option<u64>,
    #[serde(default)]
    total_pages: Option<u32>,
    #[serde(default)]
    number: u32,
    #[serde(default)]
    size: Option<u32>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PageShape<T> {
    Bare(Vec<T>),
    Paged(PagedShape<T>),
}

impl<'de, T> Deserialize<'de> for Page<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match PageShape::deserialize(deserializer)? {
            PageShape::Bare(items) => Self::single(items),
            PageShape::Paged(paged) => {
                let len = paged.content.len();
                Self {
                    total_elements: paged.total_elements.unwrap_or(len as u64),
                    total_pages: paged.total_pages.unwrap_or(u32::from(len > 0)),
                    number: paged.number,
                    size: paged
                        .size
                        .unwrap_or_else(|| u32::try_from(len).unwrap_or(u32::MAX)),
                    content: paged.content,
                }
            }
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_without_data() {
        let env: ApiResponse<serde_json::Value> =
            serde_json::from_value(json!({"success": true, "message": "User account activated"}))
                .unwrap();
        assert!(env.success);
        assert!(env.data.is_none());
        assert_eq!(env.message, "User account activated");
    }

    #[test]
    fn test_page_from_spring_shape() {
        let page: Page<u32> = serde_json::from_value(json!({
            "content": [1, 2, 3],
            "totalElements": 43,
            "totalPages": 3,
            "number": 1,
            "size": 20
        }))
        .unwrap();
        assert_eq!(page.content.len(), 3);
        assert_eq!(page.total_elements, 43);
        assert!(page.has_next());
        assert!(page.has_previous());
    }

    #[test]
    fn test_page_from_bare_array() {
        let page: Page<u32> = serde_json::from_value(json!([4, 5])).unwrap();
        assert_eq!(page.total_elements, 2);
        assert_eq!(page.total_pages, 1);
        assert!(!page.has_next());
        assert!(!page.has_previous());
    }

    #[test]
    fn test_empty_page() {
        let page: Page<u32> = serde_json::from_value(json!([])).unwrap();
        assert_eq!(page.total_pages, 0);
        assert!(!page.has_next());
    }
}
