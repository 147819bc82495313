use get_if_addrs::get_if_addrs;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Hôte utilisé quand aucune adresse réseau n'a pu être déterminée.
pub const LOCALHOST_FALLBACK: &str = "localhost";

/// Devine l'adresse IP locale sous laquelle les clients du réseau peuvent
/// joindre la machine.
///
/// # Fonctionnement
///
/// 1. Parcourt les interfaces réseau et retient la première adresse IPv4
///    non-loopback, en privilégiant les plages privées (10/8, 172.16/12, 192.168/16)
/// 2. À défaut, demande au système l'interface qui servirait à joindre
///    `8.8.8.8` via un socket UDP (aucun paquet n'est envoyé)
/// 3. En dernier recours, retourne [`LOCALHOST_FALLBACK`]
///
/// # Examples
///
/// ```
/// let host = podutils::guess_local_ip();
/// println!("Flux disponible sur http://{}:8080/feed.xml", host);
/// ```
pub fn guess_local_ip() -> String {
    let from_interfaces = get_if_addrs()
        .ok()
        .and_then(|ifaces| pick_address(ifaces.into_iter().map(|iface| iface.ip())));

    from_interfaces
        .or_else(routed_address)
        .map(|ip| ip.to_string())
        .unwrap_or_else(|| LOCALHOST_FALLBACK.to_string())
}

/// Choisit la meilleure adresse IPv4 non-loopback parmi des candidates.
fn pick_address(candidates: impl IntoIterator<Item = IpAddr>) -> Option<Ipv4Addr> {
    let v4: Vec<Ipv4Addr> = candidates
        .into_iter()
        .filter_map(|ip| match ip {
            IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
            _ => None,
        })
        .collect();

    v4.iter()
        .find(|ip| ip.is_private())
        .or_else(|| v4.first())
        .copied()
}

fn routed_address() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(v4) if !v4.is_loopback() && !v4.is_unspecified() => Some(v4),
        _ => None,
    }
}
