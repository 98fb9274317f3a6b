//! SQLite schema definition

/// SQL schema for the metadata database
pub const SCHEMA_SQL: &str = r#"
-- Chunks: pre-chunked document text, read-only to the build pipeline
CREATE TABLE IF NOT EXISTS chunks (
    id TEXT PRIMARY KEY,
    source_id TEXT NOT NULL,
    chunk_index INTEGER NOT NULL,
    chunk_text TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Vector indexes: one build ledger row per namespace + collection
CREATE TABLE IF NOT EXISTS vector_indexes (
    id TEXT PRIMARY KEY,
    namespace TEXT NOT NULL,
    collection TEXT NOT NULL,
    embedding_model_id TEXT NOT NULL,
    embedding_dim INTEGER NOT NULL,
    embedding_provider TEXT NOT NULL,
    status TEXT NOT NULL,
    is_active INTEGER NOT NULL DEFAULT 0,
    chunks_total INTEGER NOT NULL DEFAULT 0,
    chunks_done INTEGER NOT NULL DEFAULT 0,
    last_source_id TEXT,
    last_chunk_index INTEGER,
    last_chunk_id TEXT,
    error_message TEXT,
    built_at TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE(namespace, collection)
);

-- Indexes for performance
CREATE INDEX IF NOT EXISTS idx_chunks_cursor ON chunks(source_id, chunk_index, id);
CREATE INDEX IF NOT EXISTS idx_vector_indexes_active ON vector_indexes(namespace, is_active);
"#;
