/*!
 * Core Module
 * Shared constants and serde helpers
 */

pub mod limits;
pub mod serde;
