// Content Resolver - parent→children and tag→entities resolution
// Never fails on empty results; callers decide what "not found" means.

use std::sync::Arc;
use tracing::debug;

use crate::core::TagSelector;
use crate::error::AppResult;
use crate::infrastructure::{ContentStore, ListQuery};
use crate::models::{
    BlogPost, CodeSnippet, Question, QuestionWithAnswers, Technology, Topic, Tutorial,
};
use crate::services::projection::ContentRecord;

/// Visible children of a technology, each collection in its natural order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TechnologyChildren {
    pub tutorials: Vec<Tutorial>,
    pub blog_posts: Vec<BlogPost>,
    pub code_snippets: Vec<CodeSnippet>,
}

#[derive(Clone)]
pub struct ContentResolver {
    store: Arc<dyn ContentStore>,
}

impl ContentResolver {
    pub fn new(store: Arc<dyn ContentStore>) -> Self {
        Self { store }
    }

    pub async fn technology_children(&self, technology: &Technology) -> AppResult<TechnologyChildren> {
        let scoped = ListQuery::visible().filter("technology_id", technology.id);
        let (tutorials, blog_posts, code_snippets) = futures::try_join!(
            self.store.tutorials(&scoped),
            self.store.blog_posts(&scoped),
            self.store.code_snippets(&scoped),
        )?;

        Ok(TechnologyChildren {
            tutorials: tutorials.items,
            blog_posts: blog_posts.items,
            code_snippets: code_snippets.items,
        })
    }

    pub async fn tutorial_topics(&self, tutorial: &Tutorial) -> AppResult<Vec<Topic>> {
        let topics = self
            .store
            .topics(&ListQuery::all().filter("tutorial_id", tutorial.id))
            .await?;
        Ok(topics.items)
    }

    pub async fn topic_questions(&self, topic: &Topic) -> AppResult<Vec<QuestionWithAnswers>> {
        let questions = self
            .store
            .questions(&ListQuery::all().filter("topic_id", topic.id))
            .await?
            .items;
        self.with_answers(questions).await
    }

    /// Attach answers, in display order, to each question.
    pub async fn with_answers(&self, questions: Vec<Question>) -> AppResult<Vec<QuestionWithAnswers>> {
        let ids: Vec<i64> = questions.iter().map(|q| q.id).collect();
        let mut answers = self.store.answers_for(&ids).await?;
        Ok(questions
            .into_iter()
            .map(|question| QuestionWithAnswers {
                answers: answers.remove(&question.id).unwrap_or_default(),
                question,
            })
            .collect())
    }

    /// Entities of the selected kind carrying the tag, regardless of visibility.
    pub async fn tagged(&self, tag_slug: &str, selector: TagSelector) -> AppResult<Vec<ContentRecord>> {
        let query = ListQuery::all().tagged(tag_slug);
        let records: Vec<ContentRecord> = match selector {
            TagSelector::Technology => into_records(self.store.technologies(&query).await?.items),
            TagSelector::Tutorial => into_records(self.store.tutorials(&query).await?.items),
            TagSelector::Blog => into_records(self.store.blog_posts(&query).await?.items),
            TagSelector::Snippet => into_records(self.store.code_snippets(&query).await?.items),
            TagSelector::Empty => Vec::new(),
        };
        debug!(tag = tag_slug, ?selector, count = records.len(), "Resolved tagged content");
        Ok(records)
    }
}

fn into_records<T: Into<ContentRecord>>(items: Vec<T>) -> Vec<ContentRecord> {
    items.into_iter().map(Into::into).collect()
}
