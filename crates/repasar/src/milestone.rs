//! Named application states the walkthrough expects to reach and capture.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A milestone and its fixed artifact filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Milestone {
    /// Admin control center, the baseline capture
    AdminDashboard,
    /// Metadata management card opened
    MetadataManagement,
    /// AI question creator card opened
    AiQuestionCreator,
    /// Dashboard after toggling admin mode off
    StudentDashboard,
    /// Exam library view
    ExamLibrary,
    /// Quiz opened in test mode
    TestMode,
    /// First answer option selected
    QuizAnswered,
    /// Score screen after finishing the test
    ResultPage,
    /// Quiz opened in practice mode
    PracticeMode,
    /// AI insight panel after answering in practice mode
    AiInsight,
    /// Fallback capture when the practice control is absent
    DebugPracticeNotFound,
}

impl Milestone {
    /// The ten milestones of a fully successful run, in capture order.
    /// [`Self::DebugPracticeNotFound`] is conditional and excluded.
    pub const ALL: [Self; 10] = [
        Self::AdminDashboard,
        Self::MetadataManagement,
        Self::AiQuestionCreator,
        Self::StudentDashboard,
        Self::ExamLibrary,
        Self::TestMode,
        Self::QuizAnswered,
        Self::ResultPage,
        Self::PracticeMode,
        Self::AiInsight,
    ];

    /// Artifact filename for this milestone
    #[must_use]
    pub const fn filename(self) -> &'static str {
        match self {
            Self::AdminDashboard => "admin_dashboard.png",
            Self::MetadataManagement => "metadata_management.png",
            Self::AiQuestionCreator => "ai_question_creator.png",
            Self::StudentDashboard => "student_dashboard.png",
            Self::ExamLibrary => "exam_library.png",
            Self::TestMode => "test_mode.png",
            Self::QuizAnswered => "quiz_answered.png",
            Self::ResultPage => "result_page.png",
            Self::PracticeMode => "practice_mode.png",
            Self::AiInsight => "ai_insight.png",
            Self::DebugPracticeNotFound => "debug_practice_not_found.png",
        }
    }
}

impl fmt::Display for Milestone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Milestone name without the extension
        let name = self.filename();
        write!(f, "{}", &name[..name.len() - 4])
    }
}
