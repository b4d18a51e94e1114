//! IP 地址处理工具
//!
//! 提供统一的客户端 IP 提取功能，用作限流的客户端标识：
//! - 可信代理配置（trusted_proxies）
//! - CIDR 匹配

use std::net::{IpAddr, SocketAddr};

use actix_web::HttpRequest;
use actix_web::http::header::HeaderMap;
use tracing::debug;

/// 拿不到对端地址和转发头时使用的客户端标识
pub const UNKNOWN_CLIENT: &str = "unknown";

/// 检查 IP 是否在可信代理列表中
pub fn is_trusted_proxy(ip: &str, trusted_proxies: &[String]) -> bool {
    // 先尝试解析为 SocketAddr（支持 ip:port），如果失败再尝试纯 IpAddr
    let ip_addr = if let Ok(socket_addr) = ip.parse::<SocketAddr>() {
        socket_addr.ip()
    } else if let Ok(ip_addr) = ip.parse::<IpAddr>() {
        ip_addr
    } else {
        return false;
    };

    trusted_proxies.iter().any(|proxy| {
        if proxy.contains('/') {
            ip_in_cidr(&ip_addr, proxy)
        } else {
            proxy.parse::<IpAddr>().is_ok_and(|p| p == ip_addr)
        }
    })
}

/// 地址转为 (位串, 位宽)，IPv4 占低 32 位
fn addr_bits(ip: &IpAddr) -> (u128, u32) {
    match ip {
        IpAddr::V4(v4) => (u128::from(u32::from(*v4)), 32),
        IpAddr::V6(v6) => (u128::from(*v6), 128),
    }
}

/// CIDR 检查，地址族不同时不匹配
pub fn ip_in_cidr(ip: &IpAddr, cidr: &str) -> bool {
    let Some((network, prefix_len)) = cidr.split_once('/') else {
        return false;
    };
    let (Ok(network), Ok(prefix_len)) = (network.parse::<IpAddr>(), prefix_len.parse::<u32>())
    else {
        return false;
    };

    let (ip_bits, width) = addr_bits(ip);
    let (net_bits, net_width) = addr_bits(&network);
    if width != net_width || prefix_len > width {
        return false;
    }

    let host_bits = width - prefix_len;
    let mask = u128::MAX.checked_shl(host_bits).unwrap_or(0);
    (ip_bits & mask) == (net_bits & mask)
}

/// 从请求中提取客户端标识
///
/// 策略：
/// 1. 连接来自可信代理 → 使用 X-Forwarded-For / X-Real-IP
/// 2. 默认 → 使用连接 IP（防止伪造）
/// 3. 都拿不到 → `UNKNOWN_CLIENT`
pub fn extract_client_id(req: &HttpRequest, trusted_proxies: &[String]) -> String {
    let Some(peer) = req.peer_addr() else {
        return UNKNOWN_CLIENT.to_string();
    };
    let peer_ip = peer.ip().to_string();

    if !trusted_proxies.is_empty()
        && is_trusted_proxy(&peer_ip, trusted_proxies)
        && let Some(real_ip) = extract_forwarded_ip_from_headers(req.headers())
    {
        debug!("Trusted proxy {} -> {}", peer_ip, real_ip);
        return real_ip;
    }

    peer_ip
}

/// 从 HeaderMap 提取转发的 IP
pub fn extract_forwarded_ip_from_headers(headers: &HeaderMap) -> Option<String> {
    // 优先 X-Forwarded-For（取第一个，即原始客户端 IP）
    headers
        .get("x-forwarded-for")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|h| h.to_str().ok())
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}
