//! Wire types shared by the Aurora storefront server and its clients.
//!
//! * [`objects`]: request / response bodies and the common response envelope.
//! * [`session`]: signed session tokens carried in the `access-token` cookie.
//! * [`validation`]: input checks applied before a request reaches storage.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

pub mod objects;
pub mod session;
pub mod validation;
