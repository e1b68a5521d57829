//! End-to-end scenario tests, kept separate from the per-module unit tests
//! rather than inlined into the production modules.
