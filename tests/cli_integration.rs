use assert_cmd::cargo::cargo_bin_cmd;
use std::fs;
use tempfile::tempdir;

fn csrf_cookie() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("csrf-cookie");
    cmd.env_remove("HTTP_COOKIE")
        .env_remove("CSRF_COOKIE_NAME")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_cli_help_succeeds() {
    let output = csrf_cookie().arg("--help").output().expect("run csrf-cookie");
    assert!(output.status.success(), "help should exit 0");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"), "help should include usage text");
}

#[test]
fn test_cli_prints_token_from_header() {
    let output = csrf_cookie()
        .args(["--cookie", "sessionid=1; csrftoken=a%20b; x=2"])
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "a b\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CSRF token prepared"));
}

#[test]
fn test_cli_reads_http_cookie_env() {
    let output = csrf_cookie()
        .env("HTTP_COOKIE", "csrftoken=fromenv")
        .args(["--format", "header"])
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "X-CSRFToken: fromenv\n"
    );
}

#[test]
fn test_cli_custom_name_and_header() {
    let output = csrf_cookie()
        .args([
            "-b",
            "XSRF-TOKEN=abc; csrftoken=zzz",
            "-n",
            "XSRF-TOKEN",
            "--header-name",
            "X-XSRF-TOKEN",
            "-f",
            "header",
        ])
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "X-XSRF-TOKEN: abc\n"
    );
}

#[test]
fn test_cli_missing_token_exits_one() {
    let output = csrf_cookie()
        .args(["--cookie", "sessionid=1"])
        .output()
        .expect("run csrf-cookie");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CSRF cookie 'csrftoken' not found"));
    assert!(stderr.contains("csrf-cookie: error: Cookie 'csrftoken' not found"));
    assert!(!stderr.contains("CSRF token prepared"));
}

#[test]
fn test_cli_warns_about_non_django_token_shape() {
    let output = csrf_cookie()
        .args(["--cookie", "csrftoken=abc"])
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "abc\n");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CSRF token prepared from cookie 'csrftoken'"));
    assert!(stderr.contains("CSRF cookie 'csrftoken' does not look like a Django token"));
}

#[test]
fn test_cli_django_shaped_token_has_no_shape_warning() {
    let token = "a".repeat(32);
    let output = csrf_cookie()
        .arg("--cookie")
        .arg(format!("csrftoken={}", token))
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("CSRF token prepared"));
    assert!(!stderr.contains("does not look like a Django token"));
    assert!(!stderr.contains("not found"));
}

#[test]
fn test_cli_silent_suppresses_diagnostics() {
    let output = csrf_cookie()
        .args(["--cookie", "sessionid=1", "--silent"])
        .output()
        .expect("run csrf-cookie");

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stderr.is_empty());
}

#[test]
fn test_cli_json_reports_absence_successfully() {
    let output = csrf_cookie()
        .args(["-f", "json"])
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("json output");
    assert_eq!(value["cookie_name"], "csrftoken");
    assert_eq!(value["present"], false);
}

#[test]
fn test_cli_reads_cookie_file_and_writes_output_file() {
    let temp = tempdir().expect("tempdir");
    let input = temp.path().join("cookies.txt");
    let output_path = temp.path().join("token.txt");
    fs::write(&input, "Cookie: csrftoken=filetoken\n").expect("write input");

    let output = csrf_cookie()
        .arg("--cookie-file")
        .arg(&input)
        .arg("-o")
        .arg(&output_path)
        .output()
        .expect("run csrf-cookie");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert_eq!(
        fs::read_to_string(&output_path).expect("read output"),
        "filetoken\n"
    );
}

#[test]
fn test_cli_rejects_unknown_format() {
    let output = csrf_cookie()
        .args(["-b", "csrftoken=x", "-f", "yaml"])
        .output()
        .expect("run csrf-cookie");

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown output format"));
}

#[test]
fn test_cli_rejects_unsupported_browser() {
    let output = csrf_cookie()
        .args(["--cookies-from-browser", "chrome", "--url", "example.com"])
        .output()
        .expect("run csrf-cookie");

    assert_eq!(output.status.code(), Some(4));
}
