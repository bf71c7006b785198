//! End-to-end flows through build_index and answer.

use super::{document_qa, generator, EchoClient, FailingClient};
use crate::embeddings::providers::TrigramProvider;
use crate::embeddings::EmbeddingProvider;
use crate::rag::{AnswerKind, Pipeline, RetrievalSizes, RetrievedContext, NOT_FOUND_ANSWER};
use crate::types::{Chunk, LoadWarningKind, SourceFile};
use crate::{Chunker, DocumentQa, SimilarityMetric, VectorIndex};
use docqa_core::{AppError, AppResult, Mode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Embeds the index build, then loses its backend before any question is asked.
#[derive(Debug, Default)]
struct FlakyEmbedder {
    built: AtomicBool,
}

#[async_trait::async_trait]
impl EmbeddingProvider for FlakyEmbedder {
    fn provider_name(&self) -> &str {
        "flaky"
    }

    fn model_name(&self) -> &str {
        "flaky"
    }

    fn dimensions(&self) -> usize {
        3
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        if self.built.swap(true, Ordering::SeqCst) {
            return Err(AppError::Llm("embedding backend went away".to_string()));
        }
        Ok(texts.iter().map(|_| vec![1.0, 0.0, 0.0]).collect())
    }
}

#[tokio::test]
async fn test_meeting_date_is_answered_from_context() {
    let client = Arc::new(EchoClient::default());
    let qa = document_qa(client.clone());

    let build = qa
        .build_index(&[SourceFile::new("notes.txt", "The meeting is on March 3rd.")])
        .await
        .unwrap();
    assert!(build.warnings.is_empty());
    assert_eq!(build.stats.documents_loaded, 1);
    assert_eq!(build.stats.chunks_indexed, 1);

    let answer = qa.answer(&build.index, "When is the meeting?").await.unwrap();

    assert_eq!(answer.mode, Mode::Fact);
    assert_eq!(answer.kind, AnswerKind::Generated);
    assert!(answer.text.contains("March 3rd"));
    assert_eq!(answer.sources.len(), 1);
    assert_eq!(answer.sources[0].source, "notes.txt");
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_loader_resilience_in_build() {
    let qa = document_qa(Arc::new(EchoClient::default()));

    let files = vec![
        SourceFile::new("a.txt", "Quarterly revenue grew by ten percent."),
        SourceFile::new("broken.docx", b"this is not a zip archive".to_vec()),
        SourceFile::new("b.md", "# Hiring\n\nThe team hired **four** engineers."),
    ];

    let build = qa.build_index(&files).await.unwrap();

    assert_eq!(build.stats.documents_loaded, 2);
    assert_eq!(build.stats.files_skipped, 1);
    assert_eq!(build.warnings.len(), 1);
    assert_eq!(build.warnings[0].file, "broken.docx");
    assert!(matches!(
        build.warnings[0].kind,
        LoadWarningKind::ParseFailure { .. }
    ));
}

#[tokio::test]
async fn test_all_unsupported_is_no_documents_loaded() {
    let qa = document_qa(Arc::new(EchoClient::default()));

    let result = qa
        .build_index(&[SourceFile::new("image.png", vec![0u8, 1, 2])])
        .await;

    let err = result.unwrap_err();
    assert!(matches!(err, AppError::NoDocumentsLoaded(_)));
    assert!(!err.is_recoverable());
    assert_eq!(err.stage(), Some("load"));
}

#[tokio::test]
async fn test_empty_documents_are_empty_index() {
    let qa = document_qa(Arc::new(EchoClient::default()));

    let result = qa.build_index(&[SourceFile::new("empty.txt", "")]).await;

    assert!(matches!(result, Err(AppError::EmptyIndex)));
}

#[tokio::test]
async fn test_empty_context_short_circuits() {
    let client = Arc::new(EchoClient::default());
    let generator = generator(client.clone());

    let answer = generator
        .generate("When is the meeting?", Mode::Fact, &RetrievedContext::default())
        .await
        .unwrap();

    assert_eq!(answer.text, NOT_FOUND_ANSWER);
    assert_eq!(answer.kind, AnswerKind::NotFound);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_blank_chunks_short_circuit() {
    let client = Arc::new(EchoClient::default());
    let qa = document_qa(client.clone());

    let build = qa
        .build_index(&[SourceFile::new("blank.txt", "   \n\t  \n")])
        .await
        .unwrap();
    let answer = qa.answer(&build.index, "Summarize this").await.unwrap();

    assert!(answer.is_not_found());
    assert_eq!(answer.mode, Mode::Summary);
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_generation_failure_is_recoverable() {
    let client = Arc::new(FailingClient::default());
    let qa = document_qa(client.clone());

    let build = qa
        .build_index(&[SourceFile::new("notes.txt", "The meeting is on March 3rd.")])
        .await
        .unwrap();
    let err = qa
        .answer(&build.index, "When is the meeting?")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Generation(_)));
    assert!(err.is_recoverable());
    assert_eq!(client.calls(), 1);

    // The index is untouched; a retry makes exactly one more call.
    let _ = qa.answer(&build.index, "When is the meeting?").await;
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_mode_controls_context_size() {
    let client = Arc::new(EchoClient::default());
    let qa = document_qa(client.clone());

    let text: String = (0..40)
        .map(|i| format!("Section {} describes the project budget in detail. ", i))
        .collect();
    let build = qa
        .build_index(&[SourceFile::new("report.txt", text)])
        .await
        .unwrap();
    assert!(build.index.len() >= 8);

    let fact = qa.answer(&build.index, "What is the exact budget?").await.unwrap();
    let summary = qa.answer(&build.index, "Summarize the budget").await.unwrap();
    let analysis = qa.answer(&build.index, "Analyze the budget").await.unwrap();

    assert_eq!(fact.mode, Mode::Fact);
    assert_eq!(fact.sources.len(), 3);
    assert_eq!(summary.mode, Mode::Summary);
    assert_eq!(summary.sources.len(), 6);
    assert_eq!(analysis.mode, Mode::Analysis);
    assert_eq!(analysis.sources.len(), 8);
}

#[tokio::test]
async fn test_independent_indices_do_not_mix() {
    let qa = document_qa(Arc::new(EchoClient::default()));

    let first = qa
        .build_index(&[SourceFile::new("one.txt", "Alpha launch happened in June.")])
        .await
        .unwrap();
    let second = qa
        .build_index(&[SourceFile::new("two.txt", "Beta launch happened in October.")])
        .await
        .unwrap();

    let a = qa.answer(&first.index, "When was the launch?").await.unwrap();
    let b = qa.answer(&second.index, "When was the launch?").await.unwrap();

    assert_eq!(a.sources[0].source, "one.txt");
    assert_eq!(b.sources[0].source, "two.txt");
    assert!(a.text.contains("June") && !a.text.contains("October"));
}

#[tokio::test]
async fn test_concurrent_answers_share_index() {
    let client = Arc::new(EchoClient::default());
    let qa = document_qa(client.clone());
    let build = qa
        .build_index(&[SourceFile::new("notes.txt", "The meeting is on March 3rd.")])
        .await
        .unwrap();

    let (a, b) = tokio::join!(
        qa.answer(&build.index, "When is the meeting?"),
        qa.answer(&build.index, "Who is attending the meeting?")
    );

    assert!(a.unwrap().text.contains("March 3rd"));
    assert!(b.unwrap().text.contains("March 3rd"));
    assert_eq!(client.calls(), 2);
}

#[tokio::test]
async fn test_retrieval_failure_is_recoverable() {
    // An index whose query embedding cannot match its stored dimensions.
    let index = VectorIndex::build(
        vec![Chunk {
            text: "some text".to_string(),
            origin: "a.txt".to_string(),
            sequence_index: 0,
        }],
        Arc::new(TrigramProvider::new(8)),
        SimilarityMetric::Cosine,
    )
    .await
    .unwrap();

    let err = index.search_embedding(&[0.0; 4], 3).unwrap_err();
    assert!(err.is_recoverable());
    assert_eq!(err.stage(), Some("retrieve"));
}

#[tokio::test]
async fn test_query_embedding_failure_stops_before_generation() {
    let client = Arc::new(EchoClient::default());
    let pipeline = Pipeline::new(generator(client.clone()), RetrievalSizes::default());
    let qa = DocumentQa::new(
        Chunker::new(200, 20).unwrap(),
        Arc::new(FlakyEmbedder::default()),
        pipeline,
    );
    let build = qa
        .build_index(&[SourceFile::new("notes.txt", "The meeting is on March 3rd.")])
        .await
        .unwrap();

    let err = qa
        .answer(&build.index, "When is the meeting?")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Retrieval(_)));
    assert!(err.is_recoverable());
    assert_eq!(client.calls(), 0);
}
