// Error codes implementation
// Stable codes returned in the `error_code` field of API error bodies

pub mod validation {
    pub const MISSING_REQUIRED_FIELD: &str = "VALIDATION_1002";
    pub const INVALID_FORMAT: &str = "VALIDATION_1003";
    pub const OUT_OF_RANGE: &str = "VALIDATION_1004";
    pub const MALFORMED_BODY: &str = "VALIDATION_1005";
}

pub mod resource {
    pub const NOT_FOUND: &str = "RESOURCE_2001";
}

pub mod database {
    pub const CONNECTION_FAILED: &str = "DB_4001";
    pub const QUERY_FAILED: &str = "DB_4002";
    pub const CONSTRAINT_VIOLATION: &str = "DB_4003";
}
