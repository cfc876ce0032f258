use std::path::Path;
use std::time::Duration;

use futures::{stream, StreamExt};
use log::{error, info};
use tokio::time::sleep;

use crate::board::Board;
use crate::client::Client;
use crate::records;
use crate::result::Result;
use crate::storage::{self, Layout, WriteMode};

/// Number of threads downloaded in parallel.
const MAX_PARALLEL_FETCHES: usize = 5;

/// Pause between observed thread completions, as a coarse brake on request
/// volume against the remote service.
const COMPLETION_DELAY: Duration = Duration::from_secs(1);

/// Outcome counts of one [`Fetcher::fetch_top_threads`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    /// Threads selected from the catalog.
    pub selected: usize,

    /// Threads fetched, extracted, and written successfully.
    pub fetched: usize,

    /// Threads that failed to download, decode, or write.
    pub failed: usize,
}

/// Drives the fetch pipeline for one board: catalog retrieval, thread
/// selection, bounded-parallel thread processing, and record persistence.
#[derive(Debug)]
pub struct Fetcher {
    board: Board,
    client: Client,
    layout: Layout,
}

impl Fetcher {
    /// Creates a fetcher for `board` writing under `output_dir`.
    ///
    /// The board's output directories are created here, before any network
    /// use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Filesystem`](crate::Error::Filesystem) when the
    /// output directories cannot be created.
    pub fn new(board: Board, output_dir: &Path) -> Result<Self> {
        Self::with_client(Client::new(), board, output_dir)
    }

    /// Like [`Fetcher::new`] with a caller-supplied [`Client`], e.g. one
    /// pointed at a different API host.
    ///
    /// # Errors
    ///
    /// Same failure modes as [`Fetcher::new`].
    pub fn with_client(client: Client, board: Board, output_dir: &Path) -> Result<Self> {
        let layout = Layout::create(output_dir, &board)?;
        Ok(Self {
            board,
            client,
            layout,
        })
    }

    /// Fetches and persists the catalog window `[offset, offset + count)`.
    ///
    /// The catalog is flattened in page order with the within-page order
    /// preserved; an `offset` past the end yields an empty run. Up to five
    /// selected threads are processed in parallel, and a failing thread is
    /// logged and counted without aborting its siblings. After each observed
    /// completion the loop sleeps for one second.
    ///
    /// # Errors
    ///
    /// Only a catalog fetch failure aborts the run; per-thread failures
    /// surface as [`FetchSummary::failed`].
    pub async fn fetch_top_threads(&self, count: usize, offset: usize) -> Result<FetchSummary> {
        let catalog = self.client.catalog(&self.board).await?;
        let selected = catalog.select_threads(count, offset);
        info!("selected threads: {selected:?}");

        let mut summary = FetchSummary {
            selected: selected.len(),
            ..FetchSummary::default()
        };

        let mut completions = stream::iter(selected)
            .map(|thread_no| async move { (thread_no, self.process_thread(thread_no).await) })
            .buffer_unordered(MAX_PARALLEL_FETCHES);

        while let Some((thread_no, outcome)) = completions.next().await {
            match outcome {
                Ok(()) => summary.fetched += 1,
                Err(e) => {
                    error!("failed to process thread {thread_no}: {e}");
                    summary.failed += 1;
                }
            }
            sleep(COMPLETION_DELAY).await;
        }

        Ok(summary)
    }

    /// Downloads one thread and writes both of its record sets.
    async fn process_thread(&self, thread_no: u64) -> Result<()> {
        let thread = self.client.thread(&self.board, thread_no).await?;
        info!("fetched thread {thread_no}");

        let starters = records::thread_starters(&thread);
        storage::write_records(&self.layout.thread_list(), &starters, WriteMode::Append)?;
        info!(
            "appended {} starter record(s) from thread {thread_no}",
            starters.len()
        );

        let images = records::image_posts(&thread, &self.board);
        storage::write_records(
            &self.layout.image_list(&self.board, thread_no),
            &images,
            WriteMode::Truncate,
        )?;
        info!("wrote {} image record(s) for thread {thread_no}", images.len());

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{FetchSummary, Fetcher};
    use crate::board::Board;
    use crate::client::Client;
    use crate::error::Error;
    use serde_json::{json, Value};
    use std::fs;
    use std::path::Path;
    use std::sync::Arc;
    use tempdir::TempDir;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal HTTP/1.1 responder serving canned bodies by request path,
    /// closing the connection after each response. Unrouted paths get a 404.
    async fn spawn_api(routes: Vec<(&'static str, String)>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Arc::new(routes);

        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    break;
                };
                let routes = Arc::clone(&routes);
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut chunk = [0u8; 1024];
                    loop {
                        match socket.read(&mut chunk).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => {
                                request.extend_from_slice(&chunk[..n]);
                                if request.windows(4).any(|window| window == b"\r\n\r\n") {
                                    break;
                                }
                            }
                        }
                    }
                    let request = String::from_utf8_lossy(&request);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = match routes.iter().find(|(route, _)| *route == path) {
                        Some((_, body)) => ("200 OK", body.clone()),
                        None => ("404 Not Found", String::new()),
                    };
                    let response = format!(
                        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        format!("http://{addr}")
    }

    fn catalog_json(pages: &[&[u64]]) -> String {
        let pages: Vec<Value> = pages
            .iter()
            .enumerate()
            .map(|(index, numbers)| {
                json!({
                    "page": index + 1,
                    "threads": numbers.iter().map(|no| json!({ "no": no })).collect::<Vec<_>>(),
                })
            })
            .collect();
        Value::Array(pages).to_string()
    }

    fn thread_json(no: u64, sub: &str, tim: Option<u64>) -> String {
        let mut op = json!({
            "no": no,
            "resto": 0,
            "now": "01/01/24(Mon)00:00:00",
            "time": 1_704_067_200_u64,
            "name": "Anonymous",
            "sub": sub,
            "semantic_url": "some-thread",
            "replies": 1,
            "images": u64::from(tim.is_some()),
        });
        if let Some(tim) = tim {
            op["tim"] = json!(tim);
            op["ext"] = json!(".png");
            op["filename"] = json!("shot");
            op["w"] = json!(800);
            op["h"] = json!(600);
            op["fsize"] = json!(1234);
            op["md5"] = json!("deadbeef==");
        }
        json!({
            "posts": [
                op,
                { "no": no + 1, "resto": no, "name": "Anonymous", "com": "bump" },
            ]
        })
        .to_string()
    }

    fn fetcher(api_base: String, dir: &Path) -> Fetcher {
        let board = Board::new("g").unwrap();
        Fetcher::with_client(Client::with_api_base(api_base), board, dir).unwrap()
    }

    fn lines(path: &Path) -> Vec<Value> {
        fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn fetches_selected_threads_and_writes_both_record_sets() {
        let api = spawn_api(vec![
            ("/g/catalog.json", catalog_json(&[&[111, 222], &[333]])),
            ("/g/thread/111.json", thread_json(111, "first", Some(91_111))),
            ("/g/thread/222.json", thread_json(222, "second", None)),
        ])
        .await;
        let dir = TempDir::new("chanfetch").unwrap();

        let summary = fetcher(api, dir.path())
            .fetch_top_threads(2, 0)
            .await
            .unwrap();
        assert_eq!(
            summary,
            FetchSummary {
                selected: 2,
                fetched: 2,
                failed: 0
            }
        );

        let base = dir.path().join("g");
        let starters = lines(&base.join("thread_list.json"));
        assert_eq!(starters.len(), 2);

        let images = lines(&base.join("images/g-111_ImageURLs.json"));
        assert_eq!(images.len(), 1);
        assert_eq!(images[0]["url"], "https://i.4cdn.org/g/91111.png");

        assert!(lines(&base.join("images/g-222_ImageURLs.json")).is_empty());
    }

    #[tokio::test]
    async fn one_failing_thread_does_not_abort_its_siblings() {
        // 222 is cataloged but not routed, so its fetch sees a 404.
        let api = spawn_api(vec![
            ("/g/catalog.json", catalog_json(&[&[111, 222]])),
            ("/g/thread/111.json", thread_json(111, "survivor", Some(7))),
        ])
        .await;
        let dir = TempDir::new("chanfetch").unwrap();

        let summary = fetcher(api, dir.path())
            .fetch_top_threads(2, 0)
            .await
            .unwrap();
        assert_eq!(
            summary,
            FetchSummary {
                selected: 2,
                fetched: 1,
                failed: 1
            }
        );

        let base = dir.path().join("g");
        assert_eq!(lines(&base.join("thread_list.json")).len(), 1);
        assert!(base.join("images/g-111_ImageURLs.json").exists());
        assert!(!base.join("images/g-222_ImageURLs.json").exists());
    }

    #[tokio::test]
    async fn a_thread_with_a_malformed_body_is_an_isolated_failure() {
        let api = spawn_api(vec![
            ("/g/catalog.json", catalog_json(&[&[111, 222]])),
            ("/g/thread/111.json", "{not json".to_string()),
            ("/g/thread/222.json", thread_json(222, "fine", None)),
        ])
        .await;
        let dir = TempDir::new("chanfetch").unwrap();

        let summary = fetcher(api, dir.path())
            .fetch_top_threads(2, 0)
            .await
            .unwrap();
        assert_eq!(summary.fetched, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn an_offset_past_the_catalog_dispatches_nothing() {
        let api = spawn_api(vec![("/g/catalog.json", catalog_json(&[&[111, 222, 333]]))]).await;
        let dir = TempDir::new("chanfetch").unwrap();

        let summary = fetcher(api, dir.path())
            .fetch_top_threads(5, 5)
            .await
            .unwrap();
        assert_eq!(summary, FetchSummary::default());

        // Only the directory layout exists, no record files.
        assert!(dir.path().join("g/images").is_dir());
        assert!(!dir.path().join("g/thread_list.json").exists());
    }

    #[tokio::test]
    async fn a_catalog_failure_aborts_the_run() {
        let api = spawn_api(vec![]).await;
        let dir = TempDir::new("chanfetch").unwrap();

        let result = fetcher(api, dir.path()).fetch_top_threads(2, 0).await;
        assert!(matches!(result, Err(Error::UnexpectedStatus { .. })));
    }

    #[tokio::test]
    async fn refetching_overwrites_images_but_appends_starters() {
        let api = spawn_api(vec![
            ("/g/catalog.json", catalog_json(&[&[111]])),
            ("/g/thread/111.json", thread_json(111, "again", Some(42))),
        ])
        .await;
        let dir = TempDir::new("chanfetch").unwrap();
        let fetcher = fetcher(api, dir.path());

        fetcher.fetch_top_threads(1, 0).await.unwrap();
        fetcher.fetch_top_threads(1, 0).await.unwrap();

        let base = dir.path().join("g");
        assert_eq!(lines(&base.join("thread_list.json")).len(), 2);
        assert_eq!(lines(&base.join("images/g-111_ImageURLs.json")).len(), 1);
    }
}
