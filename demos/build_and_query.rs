//! Builds a vector store end to end and runs a few similarity queries.
//!
//! This demo shows how to:
//! - Load configuration from the environment (`.env` is honored)
//! - Chunk a document source, or an inline corpus when none is configured
//! - Build, persist, and reload a store without recomputing embeddings
//! - Search and assemble a bounded context block from the results
//!
//! Without an `EMBEDDING_ENDPOINT` the demo runs on the deterministic mock
//! provider, so it works with no setup:
//!
//! ```bash
//! cargo run --example build_and_query -- "how does retrieval work"
//! ```

use std::sync::Arc;

use ragweave::{
    ChunkBounds, EmbedderRegistry, EmbeddingProvider, HttpEmbeddingProvider,
    MockEmbeddingProvider, RagConfig, RagError, VectorStore, build_context, chunk_text,
    load_documents,
};

const SAMPLE_CORPUS: &str = "\
Retrieval-augmented generation grounds a language model in source documents.\n\n\
Documents are split into sentence-aligned chunks of bounded size.\n\n\
Each chunk is embedded into a normalized dense vector space.\n\n\
A flat inner-product index ranks chunks against an embedded query.\n\n\
The highest scoring chunks become the context for answer generation.";

#[tokio::main]
async fn main() -> Result<(), RagError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = RagConfig::from_env();

    let provider: Arc<dyn EmbeddingProvider> = match &config.embedding_endpoint {
        Some(endpoint) => {
            Arc::new(HttpEmbeddingProvider::new(endpoint, config.embedding_model.clone())?)
        }
        None => {
            println!("no EMBEDDING_ENDPOINT configured, using the mock provider");
            Arc::new(MockEmbeddingProvider::new())
        }
    };

    let chunks = if config.document_path.exists() {
        load_documents(&config.document_path, config.bounds).await?
    } else {
        println!(
            "{} not found, chunking the built-in sample corpus",
            config.document_path.display()
        );
        chunk_text(SAMPLE_CORPUS, ChunkBounds::new(20, 1))
    };
    println!("chunked source into {} chunks", chunks.len());

    let store = VectorStore::build_from_documents(chunks, Arc::clone(&provider)).await?;
    store.save(&config.index_path, &config.meta_path).await?;

    // Reload to demonstrate that persisted stores come back without any
    // embedding recomputation.
    let registry = EmbedderRegistry::with_provider(provider);
    let store = VectorStore::load(&config.index_path, &config.meta_path, &registry).await?;
    println!(
        "reloaded store: {} chunks, model {}",
        store.len(),
        store.embedding_model()
    );

    let queries: Vec<String> = {
        let args: Vec<String> = std::env::args().skip(1).collect();
        if args.is_empty() {
            vec!["how are documents chunked".to_string(), "ranking by similarity".to_string()]
        } else {
            args
        }
    };

    for query in queries {
        let results = store.search(&query, config.top_k, config.min_score).await?;
        println!("\nquery: {query}");
        if results.is_empty() {
            println!("  no results above the {} score floor", config.min_score);
            continue;
        }
        for (chunk, score) in &results {
            println!("  {score:.3}  [{}] {}", chunk.chunk_id, chunk.text);
        }
        let context = build_context(&results, config.max_context_words);
        println!("--- context ---\n{context}");
    }

    Ok(())
}
