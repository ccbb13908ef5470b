//! Entity, attribute and relationship metadata for the query translation
//! engine, and the gateway interface through which the engine looks it up.

pub mod metadata;
