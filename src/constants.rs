pub const DEFAULT_API_BASE: &str = "https://dummyjson.com";

pub const USER_AGENT: &str = "Forkful/1.0";

pub const SESSION_FILE: &str = "session.json";

pub mod cache {

    pub const DEFAULT_FRESHNESS_SECONDS: u64 = 60;
}

pub mod paging {

    pub const DEFAULT_PAGE_SIZE: u32 = 10;

    pub const MAX_PAGE_SIZE: u32 = 100;
}
