//! Integration tests for the brant compiler live in `tests/`; this crate
//! intentionally exports nothing.
