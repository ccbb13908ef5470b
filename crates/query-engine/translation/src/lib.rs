//! The bidirectional translation engine between Fetch query trees and
//! web-query URLs.

pub mod translation;
