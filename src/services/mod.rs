/// Admin service for roster management operations.
pub mod admin_service;
/// OpenAPI documentation generation.
pub mod documentation;
/// Core game operations bridging HTTP payloads and the rules engine.
pub mod game_service;
/// Health check service.
pub mod health_service;
/// Storage connection supervisor with reconnection and degraded mode.
pub mod storage_supervisor;
