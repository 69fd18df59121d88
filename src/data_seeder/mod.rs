use tracing::info;

use crate::{
    app_state::AppState,
    error::AppResult,
    models::{
        CodeSnippetInput, NewAnswer, NewQuestion, NewUser, QuestionDifficulty, TechnologyInput,
        TopicInput, TutorialInput,
    },
};

struct SampleQuestion {
    text: &'static str,
    explanation: &'static str,
    difficulty: QuestionDifficulty,
    answers: &'static [(&'static str, bool)],
}

/// Populate an empty store with a small, connected sample catalogue.
/// Content goes through the editor so slugs and tags follow the normal write rules.
pub async fn seed_sample_content(state: &AppState) -> AppResult<()> {
    let author = state
        .store
        .save_user(NewUser {
            username: "sample-author".to_string(),
            email: "author@example.com".to_string(),
            first_name: "Sample".to_string(),
            last_name: "Author".to_string(),
            is_staff: true,
            api_token: None,
        })
        .await?;

    let technologies = [
        ("Go", "tech_logos/go.png", "A small, fast, statically typed language built for concurrency.", vec!["beginner", "backend"]),
        ("Python", "tech_logos/python.png", "A readable general-purpose language with a huge ecosystem.", vec!["beginner", "data"]),
        ("Rust", "tech_logos/rust.png", "Memory safety without garbage collection.", vec!["systems"]),
    ];
    for (name, logo, description, tags) in technologies {
        state
            .editor
            .create_technology(TechnologyInput {
                name: Some(name.to_string()),
                logo: Some(logo.to_string()),
                description: Some(description.to_string()),
                is_active: Some(true),
                tags: Some(tags.into_iter().map(str::to_string).collect()),
                ..TechnologyInput::default()
            })
            .await?;
    }

    let tutorial = state
        .editor
        .create_tutorial(
            &author,
            TutorialInput {
                technology: Some("go".to_string()),
                title: Some("Getting Started".to_string()),
                content: Some(
                    "Install the toolchain, create a module with `go mod init`, write a main \
                     package and run it with `go run`. This tutorial walks through each step."
                        .to_string(),
                ),
                difficulty: Some("beginner".to_string()),
                thumbnail: Some("tutorial_thumbnails/go-getting-started.png".to_string()),
                is_published: Some(true),
                tags: Some(vec!["beginner".to_string()]),
                ..TutorialInput::default()
            },
        )
        .await?;

    let topics = [
        ("Installing Go", "Download the installer for your platform and check `go version`.", ""),
        ("Variables", "Declare variables with `var` or the short `:=` form.", "x := 42\nvar name string = \"gopher\""),
    ];
    let mut first_topic = None;
    for (order, (title, content, code)) in topics.into_iter().enumerate() {
        let topic = state
            .editor
            .create_topic(TopicInput {
                tutorial: Some(tutorial.slug.clone()),
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                order: Some(order as i64),
                code_snippet: Some(code.to_string()),
                is_free: Some(true),
                ..TopicInput::default()
            })
            .await?;
        first_topic.get_or_insert(topic);
    }

    if let Some(topic) = first_topic {
        let questions = [SampleQuestion {
            text: "Which command prints the installed Go version?",
            explanation: "`go version` reports the toolchain version.",
            difficulty: QuestionDifficulty::Easy,
            answers: &[("go version", true), ("go --info", false), ("go env", false)],
        }];
        for sample in questions {
            let question = state
                .store
                .insert_question(NewQuestion {
                    topic_id: topic.id,
                    text: sample.text.to_string(),
                    explanation: sample.explanation.to_string(),
                    difficulty: sample.difficulty,
                })
                .await?;
            for (order, (text, is_correct)) in sample.answers.iter().enumerate() {
                state
                    .store
                    .insert_answer(NewAnswer {
                        question_id: question.id,
                        text: text.to_string(),
                        is_correct: *is_correct,
                        order: order as i64,
                    })
                    .await?;
            }
        }
    }

    state
        .editor
        .create_code_snippet(
            &author,
            CodeSnippetInput {
                technology: Some("go".to_string()),
                title: Some("Hello, World".to_string()),
                description: Some("The smallest complete Go program.".to_string()),
                code: Some(
                    "package main\n\nimport \"fmt\"\n\nfunc main() {\n\tfmt.Println(\"Hello, World\")\n}"
                        .to_string(),
                ),
                language: Some("go".to_string()),
                tags: Some(vec!["beginner".to_string()]),
                ..CodeSnippetInput::default()
            },
        )
        .await?;

    info!("Seeded sample content");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::infrastructure::{ListQuery, SqliteContentStore};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_seed_populates_connected_content() {
        let store = Arc::new(SqliteContentStore::new_in_memory().await.unwrap());
        let state = AppState::with_store(store, Config::default());
        assert!(state.store.is_empty().await.unwrap());

        seed_sample_content(&state).await.unwrap();

        assert!(!state.store.is_empty().await.unwrap());
        let tutorials = state.store.tutorials(&ListQuery::visible()).await.unwrap();
        assert_eq!(tutorials.items[0].slug, "go-getting-started");
        let topics = state
            .resolver
            .tutorial_topics(&tutorials.items[0])
            .await
            .unwrap();
        assert_eq!(topics.len(), 2);
        let questions = state.resolver.topic_questions(&topics[0]).await.unwrap();
        assert_eq!(questions[0].answers.len(), 3);
    }
}
