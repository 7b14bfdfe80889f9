//! # Planik Bridge
//!
//! 把异步发布/订阅总线桥接成带超时的同步调用。
//!
//! 调用方发出请求后在调用线程上阻塞；总线在自己的投递上下文里
//! 送来响应，桥接层按关联 ID 配对、唤醒调用方。每次调用独享
//! 一个一次性监听槽，解析或超时后立即拆除，互不干扰。

mod bridge;
mod error;
mod pending;

pub use bridge::RequestBridge;
pub use error::BridgeError;
