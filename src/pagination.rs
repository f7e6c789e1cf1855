use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams)]
pub struct Pagination {
    #[param(default = 1, minimum = 1)]
    pub page: Option<u64>,
    #[param(default = 10, minimum = 1, maximum = 100)]
    pub limit: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total_items: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub page_size: u64,
}
