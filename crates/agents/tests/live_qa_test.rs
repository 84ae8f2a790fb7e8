//! End-to-end tests against the live OpenAI API.
//!
//! These are ignored by default. Run them with:
//!     OPENAI_API_KEY=... cargo test -- --ignored

use cinegraph_agents::{
    CatalogLoader, ChatClient, EmbeddingClient, EmbeddingIndexer, GraphQa, RetrievalQa,
    RoutingAgent,
};
use cinegraph_core::parse_catalog;
use cinegraph_db::{init_memory, Repository};

const SAMPLE: &str = "\
movieId,released,title,imdbRating,director,actors,genres
1,1995-11-22,Toy Story,8.3,John Lasseter,Jim Varney|Tim Allen|Tom Hanks|Don Rickles,Adventure|Animation|Children|Comedy|Fantasy
2,1995-12-15,Jumanji,6.9,Joe Johnston,Robin Williams|Bradley Pierce|Kirsten Dunst|Jonathan Hyde,Adventure|Children|Fantasy
3,1995-12-22,Grumpier Old Men,6.6,Howard Deutch,Walter Matthau|Ann-Margret|Jack Lemmon|Sophia Loren,Comedy|Romance
";

async fn populated_repo() -> Repository {
    let db = init_memory().await.expect("Failed to init db");
    let repo = Repository::new(db);

    let rows = parse_catalog(SAMPLE).unwrap();
    CatalogLoader::new(repo.clone())
        .load_rows(&rows)
        .await
        .expect("Failed to load rows");

    repo
}

#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY and network access"]
async fn live_similarity_question() {
    if std::env::var("OPENAI_API_KEY").is_err() {
        eprintln!("Skipping test: OPENAI_API_KEY not set");
        return;
    }

    let repo = populated_repo().await;
    let embeddings = EmbeddingClient::from_env().unwrap();
    let llm = ChatClient::from_env().unwrap();

    EmbeddingIndexer::new(repo.clone(), embeddings.clone())
        .build_index()
        .await
        .expect("Failed to build index");

    let retrieval = RetrievalQa::new(repo, embeddings, llm);
    let answer = retrieval
        .answer("Which of these movies has the highest rating?")
        .await
        .expect("Retrieval QA failed");

    println!("Answer: {}", answer);
    assert!(!answer.is_empty());
}

#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY and network access"]
async fn live_aggregation_question() {
    if std::env::var("OPENAI_API_KEY").is_err() {
        eprintln!("Skipping test: OPENAI_API_KEY not set");
        return;
    }

    let repo = populated_repo().await;
    let llm = ChatClient::from_env().unwrap();

    let graph = GraphQa::new(repo, llm);
    let answer = graph
        .answer("How many movies did Tom Hanks act in?")
        .await
        .expect("Graph QA failed");

    println!("Answer: {}", answer);
    assert!(!answer.is_empty());
}

#[tokio::test]
#[ignore = "Requires OPENAI_API_KEY and network access"]
async fn live_agent_routes_a_question() {
    if std::env::var("OPENAI_API_KEY").is_err() {
        eprintln!("Skipping test: OPENAI_API_KEY not set");
        return;
    }

    let repo = populated_repo().await;
    let embeddings = EmbeddingClient::from_env().unwrap();
    let llm = ChatClient::from_env().unwrap();

    EmbeddingIndexer::new(repo.clone(), embeddings.clone())
        .build_index()
        .await
        .expect("Failed to build index");

    let retrieval = RetrievalQa::new(repo.clone(), embeddings, llm.clone());
    let graph = GraphQa::new(repo.clone(), llm.clone());
    let agent = RoutingAgent::new(llm, retrieval, graph, repo);

    let answer = agent
        .run("Who directed Jumanji?")
        .await
        .expect("Agent run failed");

    println!("Answer: {}", answer);
    assert!(!answer.is_empty());
}
