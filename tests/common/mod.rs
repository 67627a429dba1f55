#![allow(dead_code)]

use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use reqwest::{multipart::{Form, Part}, redirect::Policy, Client, Response};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use yelpcamp::{
    app, db,
    images::{HostedImage, ImageError, ImageHost},
    AppState, HttpSettings,
};

/// Records what the site asked of the image host.
#[derive(Default)]
pub struct FakeImages {
    next: AtomicUsize,
    pub uploaded: Mutex<Vec<String>>,
    pub destroyed: Mutex<Vec<String>>,
    pub fail_upload: AtomicBool,
    pub fail_destroy: AtomicBool,
}

impl FakeImages {
    pub fn uploaded(&self) -> Vec<String> {
        self.uploaded.lock().unwrap().clone()
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }
}

#[async_trait]
impl ImageHost for FakeImages {
    async fn upload(&self, filename: &str, _bytes: Vec<u8>) -> Result<HostedImage, ImageError> {
        if self.fail_upload.load(Ordering::SeqCst) {
            return Err(ImageError::Api("image host is down".to_owned()));
        }
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        self.uploaded.lock().unwrap().push(filename.to_owned());
        Ok(HostedImage {
            url: format!("https://images.test/{n}.png"),
            public_id: format!("asset-{n}"),
        })
    }

    async fn destroy(&self, public_id: &str) -> Result<(), ImageError> {
        self.destroyed.lock().unwrap().push(public_id.to_owned());
        if self.fail_destroy.load(Ordering::SeqCst) {
            return Err(ImageError::Api("image host is down".to_owned()));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub base: String,
    pub db_pool: SqlitePool,
    pub images: Arc<FakeImages>,
}

pub async fn spawn() -> TestApp {
    let db_pool = db::connect("sqlite::memory:", 1).await.unwrap();
    let images = Arc::new(FakeImages::default());
    let router = app(
        AppState { db_pool: db_pool.clone(), images: images.clone() },
        HttpSettings::default(),
    );

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    TestApp { base: format!("http://{address}"), db_pool, images }
}

/// Location of a redirect; panics when the response is not one.
pub fn location(response: &Response) -> String {
    assert!(
        response.status().is_redirection(),
        "expected a redirect, got {}",
        response.status()
    );
    response.headers()["location"].to_str().unwrap().to_owned()
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// A browser-like client: keeps cookies, does not follow redirects.
    pub fn client(&self) -> Client {
        Client::builder()
            .cookie_store(true)
            .redirect(Policy::none())
            .build()
            .unwrap()
    }

    pub async fn get(&self, client: &Client, path: &str) -> Response {
        client.get(self.url(path)).send().await.unwrap()
    }

    pub async fn page(&self, client: &Client, path: &str) -> String {
        let response = self.get(client, path).await;
        assert!(response.status().is_success(), "GET {path} gave {}", response.status());
        response.text().await.unwrap()
    }

    pub async fn post_form(&self, client: &Client, path: &str, fields: &[(&str, &str)]) -> Response {
        client.post(self.url(path)).form(fields).send().await.unwrap()
    }

    /// Registers `username` on a fresh client, which stays logged in.
    pub async fn signed_up(&self, username: &str) -> Client {
        let client = self.client();
        let response = self
            .post_form(&client, "/register", &[("username", username), ("password", "s3cret")])
            .await;
        assert_eq!(location(&response), "/campgrounds");
        client
    }

    pub async fn submit_campground(&self, client: &Client, path: &str, name: &str, filename: Option<&str>) -> Response {
        let mut form = Form::new()
            .text("name", name.to_owned())
            .text("description", format!("{name} is lovely"));
        form = match filename {
            Some(filename) => form.part("image", Part::bytes(vec![0x89, b'P', b'N', b'G']).file_name(filename.to_owned())),
            None => form.part("image", Part::bytes(Vec::new()).file_name("")),
        };
        client.post(self.url(path)).multipart(form).send().await.unwrap()
    }

    /// Creates a campground and returns its page path.
    pub async fn create_campground(&self, client: &Client, name: &str) -> String {
        let response = self.submit_campground(client, "/campgrounds", name, Some("tent.png")).await;
        let path = location(&response);
        assert!(path.starts_with("/campgrounds/"), "unexpected redirect to {path}");
        path
    }

    /// Posts a comment and returns the new comment's id.
    pub async fn comment(&self, client: &Client, campground_path: &str, text: &str) -> uuid::Uuid {
        let response = self
            .post_form(client, &format!("{campground_path}/comments"), &[("text", text)])
            .await;
        assert_eq!(location(&response), campground_path);

        let id = campground_id(campground_path);
        db::comments::for_campground(&self.db_pool, id)
            .await
            .unwrap()
            .into_iter()
            .rfind(|comment| comment.text == text)
            .unwrap()
            .id
    }
}

pub fn campground_id(path: &str) -> uuid::Uuid {
    path.trim_start_matches("/campgrounds/").parse().unwrap()
}
