use super::sections::*;

#[test]
fn put_then_get_returns_the_content() {
    let mut sections = ConfigSections::new();
    sections.put("zookeeper", "<zookeeper/>");
    assert!(sections.get("zookeeper") == Some("<zookeeper/>"), "unexpected content {:?}", sections.get("zookeeper"));
    assert!(sections.get("remote_servers").is_none(), "expected unknown section to be absent");

    sections.put("zookeeper", "<zookeeper><node/></zookeeper>");
    assert!(sections.len() == 1, "expected 1 section, got {}", sections.len());
    assert!(sections.get("zookeeper") == Some("<zookeeper><node/></zookeeper>"), "expected later content to win");
}

#[test]
fn iteration_is_ordered_and_restartable() {
    let mut sections = ConfigSections::new();
    sections.put("settings", "s");
    sections.put("listen", "l");
    sections.put("zookeeper", "z");

    let first = sections.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
    let second = sections.iter().map(|(name, _)| name.as_str()).collect::<Vec<_>>();
    assert!(first == vec!["listen", "settings", "zookeeper"], "unexpected iteration order, got {:?}", first);
    assert!(first == second, "expected iteration to be restartable, got {:?} then {:?}", first, second);
}

#[test]
fn server_and_users_sections_are_independent() {
    let (mut server, mut users) = (ConfigSections::new(), ConfigSections::new());
    server.put("profiles", "server");
    users.put("profiles", "users");
    assert!(server.get("profiles") == Some("server"));
    assert!(users.get("profiles") == Some("users"));
}
