// Content entities - row types, insert records and write payloads

pub mod blog_post;
pub mod code_snippet;
pub mod quiz;
pub mod tag;
pub mod technology;
pub mod topic;
pub mod tutorial;
pub mod user;

pub use blog_post::{BlogPost, BlogPostInput, NewBlogPost};
pub use code_snippet::{CodeSnippet, CodeSnippetInput, Language, NewCodeSnippet};
pub use quiz::{Answer, NewAnswer, NewQuestion, Question, QuestionDifficulty, QuestionWithAnswers};
pub use tag::Tag;
pub use technology::{NewTechnology, Technology, TechnologyInput};
pub use topic::{NewTopic, Topic, TopicInput};
pub use tutorial::{Difficulty, NewTutorial, Tutorial, TutorialInput};
pub use user::{NewUser, User};
