//! The web-query side of the translation engine: the query AST the forward
//! compiler assembles, its URL query-string rendering, and the parsed
//! expression tree the reverse compiler consumes.

pub mod odata;
