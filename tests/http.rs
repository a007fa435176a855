use chrono::Local;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FastingDay {
    date: String,
    weekday: String,
    fasting_type: String,
    duration_hours: String,
    status: String,
    weight_kg: String,
    note: String,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    success: bool,
    data: T,
}

struct TestServer {
    base_url: String,
    yesterday: String,
    today: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("fasting_log_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

/// Writes a plan with yesterday (completed, weighed) and today (planned).
fn seed_data_file(path: &str, yesterday: &str, today: &str) {
    let data = json!({
        "fasting": [
            [yesterday, "Včera", "16:8", "20:00", "12:00", "16", "Dokončený", "81,4", "7", ""],
            [today, "Dnes", "18:6", "18:00", "12:00", "18", "Naplánovaný"]
        ],
        "meals": []
    });
    std::fs::write(path, serde_json::to_vec_pretty(&data).unwrap()).expect("seed data file");
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/health")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let now = Local::now().date_naive();
    let today = now.format("%d.%m.%Y").to_string();
    let yesterday = now.pred_opt().unwrap().format("%d.%m.%Y").to_string();
    seed_data_file(&data_path, &yesterday, &today);

    let child = Command::new(env!("CARGO_BIN_EXE_fasting_log"))
        .env("PORT", port.to_string())
        .env("APP_STORE", "file")
        .env("APP_DATA_PATH", data_path)
        .env_remove("API_KEY")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        yesterday,
        today,
        child,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn fetch_day(client: &Client, server: &TestServer, date: &str) -> FastingDay {
    let envelope: Envelope<FastingDay> = client
        .get(format!("{}/api/fasting/{date}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(envelope.success);
    envelope.data
}

#[tokio::test]
async fn http_partial_update_preserves_other_fields() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = fetch_day(&client, &server, &server.yesterday).await;

    let response = client
        .post(format!("{}/api/fasting", server.base_url))
        .json(&json!({ "date": server.yesterday, "note": "felt great" }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let after = fetch_day(&client, &server, &server.yesterday).await;
    assert_eq!(after.note, "felt great");
    assert_eq!(after.date, before.date);
    assert_eq!(after.weekday, before.weekday);
    assert_eq!(after.fasting_type, before.fasting_type);
    assert_eq!(after.duration_hours, before.duration_hours);
    assert_eq!(after.status, before.status);
    assert_eq!(after.weight_kg, before.weight_kg);
}

#[tokio::test]
async fn http_mark_today_completed() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response: Value = client
        .post(format!("{}/api/oznac-den", server.base_url))
        .json(&json!({ "date": server.today, "completed": true, "weightKg": "80,9" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["data"]["color"], "light green");

    let today: Envelope<FastingDay> = client
        .get(format!("{}/api/dnes", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(today.data.date, server.today);
    assert_eq!(today.data.status, "Dokončený");
    assert_eq!(today.data.fasting_type, "18:6");
    assert_eq!(today.data.weight_kg, "80,9");
}

#[tokio::test]
async fn http_unknown_day_is_not_found() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/fasting", server.base_url))
        .json(&json!({ "date": "01.01.1990", "status": "Dokončený" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn http_statistics_are_available() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let stats: Value = client
        .get(format!("{}/api/statistiky", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["success"], true);
    assert_eq!(stats["data"]["recordCount"], 2);
    assert!(stats["data"]["weight"]["measurements"].as_u64().unwrap() >= 1);

    let weekly: Value = client
        .get(format!("{}/api/analytics/tyzdenne", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(weekly["success"], true);
    assert!(weekly["data"]["recordCount"].as_u64().unwrap() >= 1);
}
