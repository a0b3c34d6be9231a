//! Fixed SQL for the trendr schema. Staging table is `tmp`; permanent tables are
//! `subreddit`, `post`, `keyword`, `post_keyword`.

pub const STAGING_TABLE: &str = "tmp";

pub const CREATE_STAGING: &str = "
CREATE TABLE IF NOT EXISTS tmp (
    id TEXT PRIMARY KEY,
    title TEXT,
    score INT,
    upvote_ratio FLOAT,
    num_comments INT,
    created_utc TIMESTAMP,
    subreddit TEXT,
    subscribers INT,
    permalink TEXT,
    url TEXT,
    domain TEXT,
    num_awards INT,
    num_crossposts INT,
    crosspost_subreddits TEXT,
    post_type TEXT,
    is_nsfw BOOLEAN,
    is_bot BOOLEAN,
    is_megathread BOOLEAN,
    body TEXT
);";

/// Records COPY order so "first seen" is well defined.
pub const ADD_STAGING_LOAD_SEQ: &str = "ALTER TABLE tmp ADD COLUMN IF NOT EXISTS load_seq BIGSERIAL;";

pub const CREATE_SUBREDDIT: &str = "
CREATE TABLE IF NOT EXISTS subreddit (
    s_name TEXT PRIMARY KEY,
    num_subscribers INT
);";

pub const CREATE_POST: &str = "
CREATE TABLE IF NOT EXISTS post (
    p_post_id SERIAL PRIMARY KEY,
    title TEXT,
    score INT,
    upvote_ratio FLOAT,
    num_comments INT,
    created_utc TIMESTAMP,
    subreddit TEXT REFERENCES subreddit(s_name),
    permalink TEXT,
    url TEXT,
    domain TEXT,
    num_awards INT,
    num_crossposts INT,
    crosspost_subreddits TEXT,
    post_type TEXT,
    is_nsfw BOOLEAN,
    is_bot BOOLEAN,
    is_megathread BOOLEAN,
    body TEXT
);";

/// Additive, safe on every rerun.
pub const ADD_SENTIMENT_COLUMN: &str =
    "ALTER TABLE post ADD COLUMN IF NOT EXISTS sentiment_score FLOAT;";

pub const CREATE_KEYWORD: &str = "CREATE TABLE IF NOT EXISTS keyword (k_word TEXT PRIMARY KEY);";

pub const CREATE_POST_KEYWORD: &str = "
CREATE TABLE IF NOT EXISTS post_keyword (
    pk_post_id INT REFERENCES post(p_post_id) ON DELETE CASCADE,
    pk_word TEXT REFERENCES keyword(k_word) ON DELETE CASCADE,
    PRIMARY KEY (pk_post_id, pk_word)
);";

/// Order matters: `subreddit` must exist before `post`, both parents before `post_keyword`.
pub const ENSURE_SCHEMA: &[&str] = &[
    CREATE_STAGING,
    ADD_STAGING_LOAD_SEQ,
    CREATE_SUBREDDIT,
    CREATE_POST,
    ADD_SENTIMENT_COLUMN,
    CREATE_KEYWORD,
    CREATE_POST_KEYWORD,
];

pub const CLEAR_TABLES: &str = "
DELETE FROM tmp;
DELETE FROM post;
DELETE FROM subreddit;
DELETE FROM keyword;
DELETE FROM post_keyword;";

/// Restart surrogate ids so a rerun reproduces the same post ids.
pub const RESTART_POST_IDS: &str =
    "SELECT setval(pg_get_serial_sequence('post', 'p_post_id'), 1, false);";

pub const RESTART_LOAD_SEQ: &str =
    "SELECT setval(pg_get_serial_sequence('tmp', 'load_seq'), 1, false);";

/// Explicit column list: CSV columns map by position and `load_seq` fills itself.
pub const COPY_INTO_STAGING: &str = "COPY tmp (
    id, title, score, upvote_ratio, num_comments, created_utc, subreddit, subscribers,
    permalink, url, domain, num_awards, num_crossposts, crosspost_subreddits, post_type,
    is_nsfw, is_bot, is_megathread, body
) FROM STDIN WITH CSV HEADER DELIMITER ','";

pub const ASSUME_NULL_BOOLS_FALSE: &str = "
UPDATE tmp
SET is_nsfw = COALESCE(is_nsfw, FALSE),
    is_bot = COALESCE(is_bot, FALSE),
    is_megathread = COALESCE(is_megathread, FALSE);";

pub const INSERT_SUBREDDITS: &str = "
INSERT INTO subreddit (s_name, num_subscribers)
SELECT DISTINCT ON (subreddit) subreddit, subscribers
FROM tmp
ORDER BY subreddit, load_seq
ON CONFLICT (s_name) DO NOTHING;";

pub const INSERT_POSTS: &str = "
INSERT INTO post (
    title, score, upvote_ratio, num_comments, created_utc, subreddit, permalink, url,
    domain, num_awards, num_crossposts, crosspost_subreddits, post_type,
    is_nsfw, is_bot, is_megathread, body, sentiment_score
)
SELECT title, score, upvote_ratio, num_comments, created_utc, subreddit, permalink, url,
    domain, num_awards, num_crossposts, crosspost_subreddits, post_type,
    is_nsfw, is_bot, is_megathread, body, NULL
FROM tmp
ORDER BY load_seq;";

pub const SELECT_POST_BODIES: &str =
    "SELECT p_post_id, body FROM post WHERE body IS NOT NULL ORDER BY p_post_id";

pub const SELECT_ALL_POST_BODIES: &str = "SELECT p_post_id, body FROM post ORDER BY p_post_id";

// COPY cannot skip conflicts, so keywords go through session-local load tables first.
pub const CREATE_KEYWORD_LOAD: &str = "
CREATE TEMP TABLE IF NOT EXISTS keyword_load (k_word TEXT);
CREATE TEMP TABLE IF NOT EXISTS post_keyword_load (pk_post_id INT, pk_word TEXT);
TRUNCATE keyword_load, post_keyword_load;";

pub const COPY_KEYWORD_LOAD: &str = "COPY keyword_load (k_word) FROM STDIN";
pub const COPY_POST_KEYWORD_LOAD: &str = "COPY post_keyword_load (pk_post_id, pk_word) FROM STDIN";

pub const MERGE_KEYWORD_LOAD: &str = "
INSERT INTO keyword (k_word)
SELECT k_word FROM keyword_load
ON CONFLICT (k_word) DO NOTHING;
INSERT INTO post_keyword (pk_post_id, pk_word)
SELECT pk_post_id, pk_word FROM post_keyword_load
ON CONFLICT DO NOTHING;
DROP TABLE IF EXISTS keyword_load, post_keyword_load;";

pub const UPDATE_SCORE: &str = "UPDATE post SET sentiment_score = $1 WHERE p_post_id = $2";

pub const UPDATE_SCORES_BATCH: &str = "
UPDATE post AS p
SET sentiment_score = v.score
FROM unnest($1::INT[], $2::FLOAT8[]) AS v(id, score)
WHERE p.p_post_id = v.id";

pub const DISABLE_STAGING_AUTOVACUUM: &str = "ALTER TABLE tmp SET (autovacuum_enabled = false);";
pub const ENABLE_STAGING_AUTOVACUUM: &str = "ALTER TABLE tmp RESET (autovacuum_enabled);";
pub const DROP_STAGING: &str = "DROP TABLE IF EXISTS tmp;";

pub const STAGING_EXISTS: &str = "SELECT to_regclass('tmp') IS NOT NULL";

pub const SELECT_SCORED_POSTS: &str = "
SELECT subreddit, created_utc, sentiment_score
FROM post
WHERE sentiment_score IS NOT NULL
ORDER BY subreddit, created_utc";
