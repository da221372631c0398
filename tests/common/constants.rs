//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fake P6 data changes (credentials, OBS tree, projects),
//! update only this file.

// ============================================================================
// Fake P6 Credentials
// ============================================================================

/// P6 user accepted by the fake upstream
pub const P6_USER: &str = "planner";

/// Password of `P6_USER`
pub const P6_PASS: &str = "s3cret";

/// `Authorization` header the fake upstream expects for `P6_USER:P6_PASS`
pub const P6_BASIC_AUTH: &str = "Basic cGxhbm5lcjpzM2NyZXQ=";

/// P6 database name used for login
pub const P6_DATABASE: &str = "PMDB";

/// JSESSIONID the fake upstream hands out on successful login
pub const P6_JSESSIONID: &str = "0A1B2C3D4E5F";

/// Path prefix of the fake P6 REST API
pub const P6_API_PREFIX: &str = "/p6ws/restapi";

// ============================================================================
// Fake P6 Data
// ============================================================================

/// OBS node "Civil Works"
pub const OBS_1_ID: i64 = 4501;
pub const OBS_1_NAME: &str = "Civil Works";

/// OBS node "Civil Works - North", child of OBS 1
pub const OBS_2_ID: i64 = 4502;
pub const OBS_2_NAME: &str = "Civil Works - North";

/// OBS node "Civil Works - South", child of OBS 1
pub const OBS_3_ID: i64 = 4503;
pub const OBS_3_NAME: &str = "Civil Works - South";

/// Project "Harbour Bridge" under OBS 1
pub const PROJECT_1_ID: &str = "HB-001";

/// Project "Ring Road" under OBS 1
pub const PROJECT_2_ID: &str = "RR-014";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
