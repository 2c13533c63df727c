// Test target selection - loopback twin unless the live site is requested

mod common;

use common::Target;
use webshop_pages::config::DEMO_BASE_URL;

#[tokio::test]
async fn test_default_target_is_loopback_twin() {
    common::init_tracing();
    if common::is_live() {
        return;
    }
    let target = Target::start().await;

    assert!(target.is_twin());
    let base = &target.config().base_url;
    assert_eq!(base.host_str(), Some("127.0.0.1"));
    assert!(!DEMO_BASE_URL.starts_with(base.origin().ascii_serialization().as_str()));

    target.shutdown();
}
