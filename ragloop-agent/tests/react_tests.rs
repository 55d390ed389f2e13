//! End-to-end loop tests with a scripted oracle and deterministic embeddings.

use std::sync::Arc;

use async_trait::async_trait;
use ragloop_agent::{
    AgentConfig, AgentError, EXHAUSTED_ANSWER, MockOracle, ReactAgent, Role, SEARCH_OBSERVATION,
    system_prompt,
};
use ragloop_rag::mock::{KeywordEmbeddingProvider, MockEmbeddingProvider};
use ragloop_rag::{EmbeddingProvider, InMemoryCorpus, RagConfig, RagError, RagPipeline};

async fn knowledge_base() -> Arc<RagPipeline> {
    let mut pipeline = RagPipeline::builder()
        .config(RagConfig::builder().max_chunks(2).build().unwrap())
        .embedding_provider(Arc::new(KeywordEmbeddingProvider::new(["topic", "other", "x"])))
        .build()
        .unwrap();
    pipeline
        .load(&InMemoryCorpus::new([
            ("Something about the other thing.", "other.md"),
            ("The topic is covered here: topic details.", "topic.md"),
            ("A brief topic mention.", "brief.md"),
        ]))
        .await
        .unwrap();
    Arc::new(pipeline)
}

fn agent(oracle: Arc<MockOracle>, pipeline: Arc<RagPipeline>, max_steps: usize) -> ReactAgent {
    ReactAgent::builder()
        .oracle(oracle)
        .pipeline(pipeline)
        .config(AgentConfig::builder().max_steps(max_steps).build().unwrap())
        .build()
        .unwrap()
}

#[tokio::test]
async fn immediate_answer_ends_after_one_step() {
    let oracle = Arc::new(MockOracle::repeating("Thought: done\nAction: Answer[42]"));
    let response = agent(oracle.clone(), knowledge_base().await, 3).run("what?").await.unwrap();

    assert_eq!(response.answer, "42");
    assert_eq!(response.steps.len(), 1);
    assert_eq!(response.steps[0].thought, "done");
    assert_eq!(response.steps[0].action, "Answer");
    assert_eq!(response.steps[0].observation, "");
    assert!(response.retrieved_chunks.is_empty());
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn search_then_answer() {
    let oracle = Arc::new(MockOracle::new([
        "Thought: need info\nAction: Search[topic]",
        "Thought: got it\nAction: Answer[final]",
    ]));
    let response = agent(oracle.clone(), knowledge_base().await, 3).run("tell me").await.unwrap();

    assert_eq!(response.answer, "final");
    assert_eq!(response.steps.len(), 2);
    assert_eq!(response.steps[0].thought, "need info");
    assert_eq!(response.steps[0].action, "Search[topic]");
    assert_eq!(response.steps[0].observation, SEARCH_OBSERVATION);
    assert_eq!(response.steps[1].thought, "got it");
    assert_eq!(response.steps[1].action, "Answer");

    let labels: Vec<_> = response.retrieved_chunks.iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(labels, vec!["topic.md", "brief.md"]);
    assert_eq!(response.retrieved_chunks[0].id, "doc-1");
    assert_eq!(response.retrieved_chunks[0].text, "The topic is covered here: topic details.");
    assert!(!response.is_exhausted());
    assert_eq!(oracle.call_count(), 2);
}

#[tokio::test]
async fn observation_is_fed_back_to_the_oracle() {
    let first = "Thought: need info\nAction: Search[topic]";
    let oracle = Arc::new(MockOracle::new([first, "Action: Answer[ok]"]));
    agent(oracle.clone(), knowledge_base().await, 3).run("tell me").await.unwrap();

    let calls = oracle.calls();
    assert_eq!(calls[0].len(), 2);
    assert_eq!(calls[0][0].role, Role::System);
    assert_eq!(calls[0][0].content, system_prompt());
    assert_eq!(calls[0][1].role, Role::User);
    assert_eq!(calls[0][1].content, "User question: tell me");

    let second = &calls[1];
    assert_eq!(second.len(), 4);
    assert_eq!(second[2].role, Role::Assistant);
    assert_eq!(second[2].content, first);
    assert_eq!(second[3].role, Role::User);
    assert!(second[3].content.starts_with(concat!(
        "Observation: Retrieved documents:\n",
        "[Document 1 | topic.md]\n",
        "The topic is covered here: topic details.\n"
    )));
    assert!(second[3].content.contains("[Document 2 | brief.md]"));
}

#[tokio::test]
async fn malformed_output_becomes_the_answer() {
    let raw = "Thought: I think\nThe capital is Paris.";
    let oracle = Arc::new(MockOracle::repeating(raw));
    let response = agent(oracle.clone(), knowledge_base().await, 3).run("capital?").await.unwrap();

    assert_eq!(response.answer, raw);
    assert_eq!(response.steps.len(), 1);
    assert_eq!(response.steps[0].thought, "I think");
    assert_eq!(response.steps[0].action, "Answer");
    assert_eq!(response.steps[0].observation, "");
    assert!(response.retrieved_chunks.is_empty());
    assert_eq!(oracle.call_count(), 1);
}

#[tokio::test]
async fn unknown_action_becomes_the_answer() {
    let raw = "Thought: t\nAction: Browse[web]";
    let oracle = Arc::new(MockOracle::repeating(raw));
    let response = agent(oracle, knowledge_base().await, 3).run("q").await.unwrap();
    assert_eq!(response.answer, raw);
    assert_eq!(response.steps.len(), 1);
}

#[tokio::test]
async fn endless_searching_exhausts_the_budget() {
    let oracle = Arc::new(MockOracle::repeating("Thought: more\nAction: Search[x]"));
    let response = agent(oracle.clone(), knowledge_base().await, 3).run("q").await.unwrap();

    assert_eq!(response.answer, EXHAUSTED_ANSWER);
    assert!(response.is_exhausted());
    assert_eq!(response.steps.len(), 3);
    assert!(response.steps.iter().all(|s| s.action == "Search[x]"));
    assert_eq!(response.retrieved_chunks.len(), 6);
    assert_eq!(oracle.call_count(), 3);
}

#[tokio::test]
async fn chunks_accumulate_without_dedup() {
    let oracle = Arc::new(MockOracle::new([
        "Action: Search[topic]",
        "Action: Search[topic]",
        "Action: Answer[done]",
    ]));
    let response = agent(oracle, knowledge_base().await, 3).run("q").await.unwrap();

    let ids: Vec<_> = response.retrieved_chunks.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["doc-1", "doc-2", "doc-1", "doc-2"]);
    assert_eq!(response.steps.len(), 3);
}

#[tokio::test]
async fn empty_search_falls_back_to_user_query() {
    let oracle =
        Arc::new(MockOracle::new(["Thought: look\nAction: Search[ ]", "Action: Answer[a]"]));
    let response = agent(oracle, knowledge_base().await, 3).run("other").await.unwrap();

    assert_eq!(response.steps[0].action, "Search[other]");
    assert_eq!(response.retrieved_chunks[0].filename, "other.md");
}

#[tokio::test]
async fn empty_knowledge_base_still_answers() {
    let mut pipeline = RagPipeline::builder()
        .embedding_provider(Arc::new(MockEmbeddingProvider::new(8)))
        .build()
        .unwrap();
    pipeline.load(&InMemoryCorpus::default()).await.unwrap();

    let oracle = Arc::new(MockOracle::new(["Action: Search[anything]", "Action: Answer[no idea]"]));
    let response = agent(oracle.clone(), Arc::new(pipeline), 3).run("q").await.unwrap();

    assert_eq!(response.answer, "no idea");
    assert!(response.retrieved_chunks.is_empty());
    assert_eq!(oracle.calls()[1][3].content, "Observation: Retrieved documents:\n");
}

#[tokio::test]
async fn oracle_failure_aborts_the_run() {
    let oracle = Arc::new(MockOracle::new(["Action: Search[topic]"]).then_fail("quota exceeded"));
    let err = agent(oracle, knowledge_base().await, 3).run("q").await.unwrap_err();
    assert!(matches!(
        err,
        AgentError::OracleError { ref message, .. } if message == "quota exceeded"
    ));
}

/// Embeds documents in bulk but fails on every single-query call.
struct QueryFailingProvider;

#[async_trait]
impl EmbeddingProvider for QueryFailingProvider {
    async fn embed(&self, _text: &str) -> ragloop_rag::Result<Vec<f32>> {
        Err(RagError::EmbeddingError { provider: "Flaky".into(), message: "unreachable".into() })
    }

    async fn embed_batch(&self, texts: &[&str]) -> ragloop_rag::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    fn dimensions(&self) -> usize {
        2
    }
}

#[tokio::test]
async fn embedding_failure_during_search_aborts_the_run() {
    let mut pipeline =
        RagPipeline::builder().embedding_provider(Arc::new(QueryFailingProvider)).build().unwrap();
    pipeline.load(&InMemoryCorpus::new([("text", "a.md")])).await.unwrap();

    let oracle = Arc::new(MockOracle::repeating("Action: Search[x]"));
    let err = agent(oracle.clone(), Arc::new(pipeline), 3).run("q").await.unwrap_err();

    assert!(matches!(err, AgentError::Retrieval(RagError::EmbeddingError { .. })));
    assert_eq!(oracle.call_count(), 1);
}

#[test]
fn zero_step_budget_is_rejected() {
    assert!(matches!(
        AgentConfig::builder().max_steps(0).build(),
        Err(AgentError::ConfigError(_))
    ));
}

#[test]
fn builder_requires_oracle_and_pipeline() {
    let err = ReactAgent::builder().build().err().unwrap();
    assert!(matches!(err, AgentError::ConfigError(_)));
}
