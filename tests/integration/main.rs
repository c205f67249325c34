//! Integration tests for node-buildpack

mod common;

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;

    fn buildpack() -> Command {
        cargo_bin_cmd!("node-buildpack")
    }

    #[test]
    fn help_displays() {
        buildpack()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Cloud Native Buildpack that installs a Node.js runtime layer"));
    }

    #[test]
    fn version_displays() {
        buildpack()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("node-buildpack"));
    }

    #[test]
    fn build_without_arguments_fails() {
        buildpack().arg("build").assert().failure();
    }
}

mod build_tests {
    use crate::common::{write_plan, BuildDirs, FixtureServer, DOWNLOAD_PATH};
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;

    const CANONICAL: &str = "launch = true\nbuild = false\ncache = false\n";

    fn build(dirs: &BuildDirs) -> Command {
        let mut cmd = cargo_bin_cmd!("node-buildpack");
        cmd.current_dir(&dirs.app)
            .env_remove("NODE_BUILDPACK_CONFIG")
            .arg("build")
            .arg(&dirs.layers)
            .arg(&dirs.platform)
            .arg(&dirs.plan)
            .arg("--buildpack-toml")
            .arg(&dirs.buildpack_toml);
        cmd
    }

    fn assert_node_layer(dirs: &BuildDirs) {
        assert!(dirs.layer("node").is_dir());
        assert!(dirs.layer("node/fake_archive_root").is_dir());
        assert_eq!(
            fs::read_to_string(dirs.layer("node/fake_archive_root/file.txt")).unwrap(),
            "some file contents\n"
        );
        assert!(dirs.layer("node/fake_archive_root/inner_dir").is_dir());
        assert_eq!(
            fs::read_to_string(dirs.layer("node/fake_archive_root/inner_dir/inner_file.txt")).unwrap(),
            "inner file contents\n"
        );
        assert_eq!(fs::read_to_string(dirs.layer("node.toml")).unwrap(), CANONICAL);
    }

    #[test]
    fn fresh_build_installs_node() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");

        build(&dirs)
            .assert()
            .success()
            .stdout(predicate::str::contains("--- Decoding buildpack.toml file"))
            .stdout(predicate::str::contains("--- Success!"));

        assert_node_layer(&dirs);
    }

    #[test]
    fn existing_layer_metadata_is_overwritten() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        fs::write(dirs.layer("node.toml"), "initial contents").unwrap();

        build(&dirs).assert().success();
        assert_node_layer(&dirs);
    }

    #[test]
    fn unmet_constraint_exits_100() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "10.0.x");

        build(&dirs)
            .assert()
            .code(100)
            .stderr(predicate::str::contains(
                "no match for version constraint in buildpack.toml",
            ));

        assert!(!dirs.layer("node.toml").exists());
        assert!(dirs.layers_is_empty());
    }

    #[test]
    fn plan_without_node_entry_exits_100() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        fs::write(&dirs.plan, "[[entries]]\nname = \"yarn\"\nversion = \"1.x\"\n").unwrap();

        build(&dirs)
            .assert()
            .code(100)
            .stderr(predicate::str::contains("'node' version constraint"));
    }

    #[test]
    fn not_found_download_leaves_layers_untouched() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url("/missing.tgz"), "14.x");

        build(&dirs)
            .assert()
            .code(100)
            .stderr(predicate::str::contains("invalid response status 404"));

        assert!(dirs.layers_is_empty());
    }

    #[test]
    fn comparison_range_builds() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), ">=14.0.0 <15.0.0");

        build(&dirs).assert().success();
        assert_node_layer(&dirs);
    }

    #[test]
    fn config_file_renames_layer() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        let config = dirs.platform.join("node-buildpack.toml");
        fs::write(&config, "[layer]\nname = \"runtime\"\ncache = true\n").unwrap();

        build(&dirs).arg("--config").arg(&config).assert().success();

        assert!(dirs.layer("runtime/fake_archive_root/file.txt").is_file());
        assert_eq!(
            fs::read_to_string(dirs.layer("runtime.toml")).unwrap(),
            "launch = true\nbuild = false\ncache = true\n"
        );
    }

    #[test]
    fn invalid_config_exits_100() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        let config = dirs.platform.join("node-buildpack.toml");
        fs::write(&config, "[layer\n").unwrap();

        build(&dirs)
            .arg("--config")
            .arg(&config)
            .assert()
            .code(100)
            .stderr(predicate::str::contains("Invalid configuration"));
    }

    #[cfg(unix)]
    #[test]
    fn bin_build_link_finds_buildpack_toml() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        let link = dirs.buildpack_dir.join("bin/build");
        std::os::unix::fs::symlink(env!("CARGO_BIN_EXE_node-buildpack"), &link).unwrap();

        Command::new(&link)
            .current_dir(&dirs.app)
            .env_remove("NODE_BUILDPACK_TOML")
            .env_remove("NODE_BUILDPACK_CONFIG")
            .arg(&dirs.layers)
            .arg(&dirs.platform)
            .arg(&dirs.plan)
            .assert()
            .success();

        assert_node_layer(&dirs);
    }

    #[test]
    fn rebuild_after_plan_change() {
        let server = FixtureServer::with_node_archive();
        let dirs = BuildDirs::new(&server.url(DOWNLOAD_PATH), "14.x");
        build(&dirs).assert().success();

        write_plan(&dirs.plan, "14.5.0");
        build(&dirs).assert().success();
        assert_node_layer(&dirs);
    }
}

mod detect_tests {
    use assert_cmd::cargo::cargo_bin_cmd;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn detect_passes_for_onboarding_app() {
        let temp = TempDir::new().unwrap();
        let app = temp.path().join("application");
        fs::create_dir_all(&app).unwrap();
        fs::write(
            app.join("package.json"),
            r#"{ "name": "onboarding_app", "engines": { "node": "14.x" } }"#,
        )
        .unwrap();
        let plan = temp.path().join("plan.toml");

        cargo_bin_cmd!("node-buildpack")
            .current_dir(&app)
            .env_remove("NODE_BUILDPACK_CONFIG")
            .arg("detect")
            .arg(temp.path())
            .arg(&plan)
            .assert()
            .success();

        let written = fs::read_to_string(&plan).unwrap();
        assert!(written.contains("[[provides]]"));
        assert!(written.contains("[[require]]"));
        assert!(written.contains("version = \"14.x\""));
    }

    #[test]
    fn detect_fails_without_package_json() {
        let temp = TempDir::new().unwrap();
        let plan = temp.path().join("plan.toml");

        cargo_bin_cmd!("node-buildpack")
            .current_dir(temp.path())
            .env_remove("NODE_BUILDPACK_CONFIG")
            .arg("detect")
            .arg(temp.path())
            .arg(&plan)
            .assert()
            .code(100);

        assert!(!plan.exists());
    }
}
