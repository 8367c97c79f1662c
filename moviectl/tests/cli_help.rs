use assert_cmd::cargo::cargo_bin_cmd;
use predicates::str::contains;

fn help_for(args: &[&str]) -> String {
    let mut cmd = cargo_bin_cmd!("moviectl");
    let output = cmd
        .args(args)
        .arg("--help")
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    String::from_utf8_lossy(&output).into_owned()
}

#[test]
fn top_level_help_lists_commands() {
    let text = help_for(&[]);
    for command in ["import", "preview", "library", "browse", "actor", "collection"] {
        assert!(text.contains(command), "help missing '{command}'");
    }
    assert!(text.contains("--json"), "help missing --json flag");
}

#[test]
fn collection_subcommands_present() {
    let text = help_for(&["collection"]);
    for action in ["list", "create", "rename", "delete", "members", "set", "attach"] {
        assert!(text.contains(action), "collection help missing '{action}'");
    }
}

#[test]
fn add_documents_image_and_collection_flags() {
    let text = help_for(&["add"]);
    assert!(text.contains("--poster"), "add help missing --poster");
    assert!(text.contains("--backdrop"), "add help missing --backdrop");
    assert!(text.contains("--collection"), "add help missing --collection");
}

#[test]
fn browse_defaults_to_sixteen_movies() {
    let text = help_for(&["browse"]);
    assert!(text.contains("[default: 16]"), "browse help missing count default");
}

#[test]
fn import_requires_an_id() {
    cargo_bin_cmd!("moviectl")
        .arg("import")
        .assert()
        .failure()
        .stderr(contains("TMDB_ID"));
}

#[test]
fn unknown_category_is_rejected() {
    cargo_bin_cmd!("moviectl")
        .args(["browse", "trending"])
        .assert()
        .failure()
        .stderr(contains("trending"));
}

#[test]
fn catalog_commands_need_an_api_key() {
    let dir = tempfile::tempdir().expect("tempdir");
    cargo_bin_cmd!("moviectl")
        .current_dir(dir.path())
        .env_remove("TMDB_API_KEY")
        .env_remove("MOVIEPRO_CONFIG")
        .args(["preview", "603"])
        .assert()
        .failure()
        .stderr(contains("TMDB_API_KEY"));
}
