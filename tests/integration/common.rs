//! Shared fixtures: a loopback HTTP server and buildpack directory layouts

use flate2::write::GzEncoder;
use flate2::Compression;
use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::path::{Path, PathBuf};
use std::thread;
use tar::{Builder, EntryType, Header};
use tempfile::TempDir;

pub const DOWNLOAD_PATH: &str = "/some-download-url";

/// Minimal HTTP/1.1 server answering GETs from a fixed route table
pub struct FixtureServer {
    addr: SocketAddr,
}

impl FixtureServer {
    pub fn start(routes: HashMap<String, Vec<u8>>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                respond(stream, &routes);
            }
        });
        Self { addr }
    }

    /// Server that serves `node_archive()` at `DOWNLOAD_PATH`
    pub fn with_node_archive() -> Self {
        Self::start(HashMap::from([(DOWNLOAD_PATH.to_string(), node_archive())]))
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

fn respond(mut stream: TcpStream, routes: &HashMap<String, Vec<u8>>) {
    let Ok(clone) = stream.try_clone() else {
        return;
    };
    let mut reader = BufReader::new(clone);
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    loop {
        let mut header = String::new();
        match reader.read_line(&mut header) {
            Ok(0) | Err(_) => break,
            Ok(_) if header == "\r\n" || header == "\n" => break,
            Ok(_) => {}
        }
    }

    let path = request_line.split_whitespace().nth(1).unwrap_or("/");
    let (status, body) = match routes.get(path) {
        Some(body) => ("200 OK", body.clone()),
        None => ("404 Not Found", b"404 page not found\n".to_vec()),
    };
    let _ = write!(
        stream,
        "HTTP/1.1 {status}\r\nContent-Type: application/octet-stream\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        body.len()
    );
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

/// The `fake_archive_root` tree used throughout the build tests
pub fn node_archive() -> Vec<u8> {
    let mut builder = Builder::new(GzEncoder::new(Vec::new(), Compression::default()));
    let entries: [(&str, Option<&[u8]>); 4] = [
        ("fake_archive_root", None),
        ("fake_archive_root/file.txt", Some(b"some file contents\n")),
        ("fake_archive_root/inner_dir", None),
        ("fake_archive_root/inner_dir/inner_file.txt", Some(b"inner file contents\n")),
    ];
    for (path, data) in entries {
        let mut header = Header::new_gnu();
        match data {
            Some(data) => {
                header.set_entry_type(EntryType::Regular);
                header.set_mode(0o644);
                header.set_size(data.len() as u64);
                builder.append_data(&mut header, path, data).unwrap();
            }
            None => {
                header.set_entry_type(EntryType::Directory);
                header.set_mode(0o755);
                header.set_size(0);
                builder.append_data(&mut header, path, std::io::empty()).unwrap();
            }
        }
    }
    builder.into_inner().unwrap().finish().unwrap()
}

/// Temporary buildpack + lifecycle directories for one build
pub struct BuildDirs {
    _temp: TempDir,
    pub buildpack_dir: PathBuf,
    pub buildpack_toml: PathBuf,
    pub layers: PathBuf,
    pub platform: PathBuf,
    pub plan: PathBuf,
    pub app: PathBuf,
}

impl BuildDirs {
    pub fn new(uri: &str, plan_range: &str) -> Self {
        let temp = TempDir::new().unwrap();
        let base = temp.path();

        let buildpack_dir = base.join("buildpack");
        std::fs::create_dir_all(buildpack_dir.join("bin")).unwrap();
        let buildpack_toml = buildpack_dir.join("buildpack.toml");
        std::fs::write(&buildpack_toml, buildpack_toml_content(uri)).unwrap();

        let layers = base.join("layers");
        let platform = base.join("platform");
        let app = base.join("app-dir");
        for dir in [&layers, &platform, &app] {
            std::fs::create_dir_all(dir).unwrap();
        }

        let plan = base.join("plan.toml");
        write_plan(&plan, plan_range);

        Self {
            _temp: temp,
            buildpack_dir,
            buildpack_toml,
            layers,
            platform,
            plan,
            app,
        }
    }

    pub fn layer(&self, relative: &str) -> PathBuf {
        self.layers.join(relative)
    }

    pub fn layers_is_empty(&self) -> bool {
        std::fs::read_dir(&self.layers).unwrap().next().is_none()
    }
}

pub fn write_plan(path: &Path, range: &str) {
    std::fs::write(
        path,
        format!("\n[[entries]]\n  name = \"node\"\n  version = \"{range}\"\n"),
    )
    .unwrap();
}

fn buildpack_toml_content(uri: &str) -> String {
    format!(
        r#"
[buildpack]
  id = "some-test/buildpack"
  name = "Super cool test"

[metadata]
  [[metadata.dependencies]]
    id = "some-dependency"
    sha256 = "NA"
    stacks = ["io.buildpacks.stacks.bionic"]
    uri = "{uri}"
    version = "14.5.0"

[[stacks]]
  id = "io.buildpacks.stacks.bionic"
"#
    )
}
