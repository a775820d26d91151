// src/utils/html.rs

use crate::models::{
    answer::CreateAnswerRequest,
    question::CreateQuestionRequest,
    quiz::{CreateQuizRequest, UpdateQuizRequest},
};

/// Strips dangerous markup (scripts, event handlers) from author-supplied text
/// while keeping harmless formatting tags.
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}

fn clean_opt(input: Option<String>) -> Option<String> {
    input.map(|s| clean_html(&s))
}

/// Text fields authors write that are later rendered to quiz takers.
pub trait Sanitize {
    fn sanitized(self) -> Self;
}

impl Sanitize for CreateQuizRequest {
    fn sanitized(self) -> Self {
        Self {
            title: clean_html(&self.title),
            description: clean_opt(self.description),
            cover_image: self.cover_image,
        }
    }
}

impl Sanitize for UpdateQuizRequest {
    fn sanitized(self) -> Self {
        Self {
            title: clean_opt(self.title),
            description: self.description.map(clean_opt),
            ..self
        }
    }
}

impl Sanitize for CreateQuestionRequest {
    fn sanitized(self) -> Self {
        Self {
            text: clean_html(&self.text),
            ..self
        }
    }
}

impl Sanitize for CreateAnswerRequest {
    fn sanitized(self) -> Self {
        Self {
            text: clean_html(&self.text),
            explanation: clean_opt(self.explanation),
            ..self
        }
    }
}
