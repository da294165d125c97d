//! Filter and pagination parameters for list endpoints.
//!
//! Every field is optional. An absent field is left out of the query string
//! entirely; the API combines the ones present with AND.

use std::fmt;

use url::form_urlencoded;

use crate::types::{ApplicantStatus, EmploymentType, PositionStatus, SortOrder};

/// List parameters, generic over the resource's status enum.
#[derive(Debug, Clone, PartialEq)]
pub struct ListFilters<S> {
    pub status: Option<S>,
    pub department: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<EmploymentType>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

pub type ApplicantFilters = ListFilters<ApplicantStatus>;
pub type PositionFilters = ListFilters<PositionStatus>;

impl<S> Default for ListFilters<S> {
    fn default() -> Self {
        Self {
            status: None,
            department: None,
            location: None,
            employment_type: None,
            search: None,
            page: None,
            limit: None,
            sort_by: None,
            sort_order: None,
        }
    }
}

impl<S: fmt::Display> ListFilters<S> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(mut self, status: S) -> Self {
        self.status = Some(status);
        self
    }

    pub fn department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn employment_type(mut self, employment_type: EmploymentType) -> Self {
        self.employment_type = Some(employment_type);
        self
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort(mut self, sort_by: impl Into<String>, order: SortOrder) -> Self {
        self.sort_by = Some(sort_by.into());
        self.sort_order = Some(order);
        self
    }

    /// Query pairs in wire order, skipping absent fields.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        let mut push = |key: &'static str, value: Option<String>| {
            if let Some(value) = value {
                pairs.push((key, value));
            }
        };

        push("status", self.status.as_ref().map(|s| s.to_string()));
        push("department", self.department.clone());
        push("location", self.location.clone());
        push("type", self.employment_type.map(|t| t.as_str().to_string()));
        push("search", self.search.clone());
        push("page", self.page.map(|p| p.to_string()));
        push("limit", self.limit.map(|l| l.to_string()));
        push("sortBy", self.sort_by.clone());
        push("sortOrder", self.sort_order.map(|o| o.as_str().to_string()));

        pairs
    }

    /// Append the encoded query string to `path`.
    pub fn apply(&self, path: &str) -> String {
        let pairs = self.query_pairs();
        if pairs.is_empty() {
            return path.to_string();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &pairs {
            serializer.append_pair(key, value);
        }
        format!("{}?{}", path, serializer.finish())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_leave_path_untouched() {
        assert_eq!(ApplicantFilters::new().apply("/applicants"), "/applicants");
    }

    #[test]
    fn all_fields_are_encoded_in_order() {
        let filters = PositionFilters::new()
            .status(PositionStatus::Open)
            .department("Engineering")
            .location("New York")
            .employment_type(EmploymentType::FullTime)
            .search("rust & go")
            .page(2)
            .limit(25)
            .sort("postedAt", SortOrder::Desc);

        assert_eq!(
            filters.apply("/positions"),
            "/positions?status=open&department=Engineering&location=New+York&type=full-time\
             &search=rust+%26+go&page=2&limit=25&sortBy=postedAt&sortOrder=desc"
        );
    }

    #[test]
    fn only_present_fields_are_sent() {
        let filters = ApplicantFilters::new().status(ApplicantStatus::Offer).page(1);
        assert_eq!(
            filters.query_pairs(),
            vec![("status", "offer".to_string()), ("page", "1".to_string())]
        );
    }
}
