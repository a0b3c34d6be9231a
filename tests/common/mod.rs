#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};
use trendr::{DbConfig, TrendrImport};

pub const HEADER: &str = "id,title,score,upvote_ratio,num_comments,created_utc,subreddit,subscribers,\
permalink,url,domain,num_awards,num_crossposts,crosspost_subreddits,post_type,is_nsfw,is_bot,is_megathread,body";

pub const MANIFEST: &str = "50_subreddits_list.csv";

/// Database tests share the five tables, so they take turns.
static DB_LOCK: Mutex<()> = Mutex::new(());

/// Connection for database-backed tests, or `None` when no test database is configured.
/// Point `TRENDR_TEST_DATABASE_URL` at a scratch database, e.g.
/// `postgresql://postgres@localhost:5432/trendr_test`.
pub fn test_db() -> Option<(DbConfig, MutexGuard<'static, ()>)> {
    let url = std::env::var("TRENDR_TEST_DATABASE_URL").ok()?;
    let guard = DB_LOCK.lock().unwrap_or_else(|p| p.into_inner());
    Some((DbConfig::from_url(&url).unwrap(), guard))
}

pub fn write_csv(path: &Path, rows: &[&str]) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let mut s = String::from(HEADER);
    s.push('\n');
    for r in rows {
        s.push_str(r);
        s.push('\n');
    }
    fs::write(path, s).unwrap();
}

/// Build a tiny data directory:
/// - `a_rust.csv`: 3 posts in r/rust (1000 subscribers), one with a null body and null flags.
/// - `b_mixed.csv`: 1 post in r/golang, 1 more in r/rust carrying a different subscriber
///   count (2000) that must be ignored.
/// - the manifest file, which is never loaded (its contents would not even parse as posts).
///
/// Dates span 2024-01-01 .. 2024-01-03 with a gap day in r/rust.
pub fn make_data_dir() -> (tempfile::TempDir, PathBuf) {
    let tmp = tempfile::tempdir().unwrap();
    let data = tmp.path().join("data");

    write_csv(
        &data.join("a_rust.csv"),
        &[
            r#"r1,Rust 2024 edition,120,0.97,45,2024-01-01 09:30:00,rust,1000,/r/rust/r1,https://blog.rust-lang.org,blog.rust-lang.org,2,1,,link,false,false,false,"I love this language, it's great!""#,
            r#"r2,Borrow checker woes,15,0.6,30,2024-01-01 18:00:00,rust,1000,/r/rust/r2,https://reddit.com/r/rust/r2,self.rust,0,0,,text,,,,"The compiler is terrible and I hate lifetimes 100%""#,
            r#"r3,Weekly thread,5,0.8,2,2024-01-03 12:00:00,rust,1000,/r/rust/r3,https://reddit.com/r/rust/r3,self.rust,0,0,,text,false,true,true,"#,
        ],
    );
    write_csv(
        &data.join("b_mixed.csv"),
        &[
            r#"g1,Go generics,40,0.9,12,2024-01-02 08:00:00,golang,500,/r/golang/g1,https://go.dev,go.dev,0,0,,link,false,false,false,"Generics are nice, but the syntax is not good""#,
            r#"r4,Cargo tips,60,0.95,8,2024-01-02 11:00:00,rust,2000,/r/rust/r4,https://doc.rust-lang.org,doc.rust-lang.org,1,0,,link,false,false,false,"Cargo makes builds easy and fun""#,
        ],
    );
    fs::write(data.join(MANIFEST), "subreddit\nrust\ngolang\n").unwrap();

    (tmp, data)
}

pub fn import_for(db: &DbConfig, data: &Path, out: &Path) -> TrendrImport {
    TrendrImport::new()
        .db(db.clone())
        .data_dir(data)
        .exclude_file(MANIFEST)
        .output_dir(out)
        .progress(false)
}
