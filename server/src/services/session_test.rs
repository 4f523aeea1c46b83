use super::*;

// =============================================================================
// fake_mac_from_ip
// =============================================================================

#[test]
fn fake_mac_sums_octets() {
    // 10 + 0 + 0 + 7 = 17 = 0x11
    assert_eq!(fake_mac_from_ip("10.0.0.7"), "02:00:00:00:00:11");
}

#[test]
fn fake_mac_loopback() {
    // 127 + 0 + 0 + 1 = 128 = 0x80
    assert_eq!(fake_mac_from_ip("127.0.0.1"), "02:00:00:00:00:80");
}

#[test]
fn fake_mac_wraps_modulo_255() {
    // 255 * 4 = 1020, 1020 % 255 = 0
    assert_eq!(fake_mac_from_ip("255.255.255.255"), "02:00:00:00:00:00");
    // 192 + 168 + 1 + 20 = 381, 381 % 255 = 126 = 0x7e
    assert_eq!(fake_mac_from_ip("192.168.1.20"), "02:00:00:00:00:7e");
}

#[test]
fn fake_mac_is_deterministic() {
    assert_eq!(fake_mac_from_ip("172.16.4.9"), fake_mac_from_ip("172.16.4.9"));
}

#[test]
fn fake_mac_differs_for_different_ips() {
    assert_ne!(fake_mac_from_ip("10.0.0.7"), fake_mac_from_ip("10.0.0.8"));
}

#[test]
fn fake_mac_tolerates_non_ipv4_input() {
    assert_eq!(fake_mac_from_ip("::1"), "02:00:00:00:00:00");
    assert_eq!(fake_mac_from_ip(""), "02:00:00:00:00:00");
}

#[test]
fn fake_mac_uses_leading_digits_of_each_octet() {
    assert_eq!(fake_mac_from_ip("10x.0.0.7"), fake_mac_from_ip("10.0.0.7"));
}

// =============================================================================
// SessionKey
// =============================================================================

#[test]
fn session_key_renders_zone_and_ip() {
    assert_eq!(SessionKey::new(5, "10.0.0.7").to_string(), "5:10.0.0.7");
}

#[test]
fn session_keys_differ_per_zone() {
    assert_ne!(SessionKey::new(0, "10.0.0.7"), SessionKey::new(1, "10.0.0.7"));
}

// =============================================================================
// Session / ids
// =============================================================================

#[test]
fn generate_session_id_two_calls_differ() {
    assert_ne!(generate_session_id(), generate_session_id());
}

#[test]
fn session_start_is_authorized_with_derived_mac() {
    let session = Session::start("maker", "10.0.0.7");
    assert!(session.authorized);
    assert_eq!(session.user, "maker");
    assert_eq!(session.mac, "02:00:00:00:00:11");
    assert!(!session.session_id.is_empty());
    assert!(session.start_time > 1_600_000_000.0);
}

// =============================================================================
// SessionStore
// =============================================================================

#[tokio::test]
async fn store_insert_get_remove() {
    let store = SessionStore::new();
    let key = SessionKey::new(0, "10.0.0.7");
    assert!(store.get(&key).await.is_none());

    store.write().await.insert(key.clone(), Session::start("maker", "10.0.0.7"));
    assert_eq!(store.read().await.len(), 1);
    assert_eq!(store.get(&key).await.map(|s| s.user), Some("maker".to_owned()));

    assert!(store.write().await.remove(&key).is_some());
    assert!(store.get(&key).await.is_none());
}

#[tokio::test]
async fn store_clones_share_the_same_table() {
    let store = SessionStore::new();
    let other = store.clone();
    let key = SessionKey::new(2, "10.0.0.9");
    store.write().await.insert(key.clone(), Session::start("ats-demo", "10.0.0.9"));
    assert!(other.get(&key).await.is_some());
}
