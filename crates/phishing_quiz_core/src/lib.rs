pub mod calendar;
pub mod domain;
pub mod ports;
pub mod preview;
pub mod session;
pub mod wizard;

pub use calendar::{CalendarDay, CalendarMonth, CalendarView, DayStatus};
pub use domain::{
    AdminQuizDraft, AdminQuizItemDraft, AnswerChoice, AnswerOutcome, AnswerRecord, Channel,
    ForumPost, LeaderboardEntry, NewForumPost, Profile, QuizItem, TodayQuiz, QUIZ_LENGTH,
};
pub use ports::{
    AdminQuizService, AuthService, ForumService, PortError, PortResult, ProfileService,
    QuizService,
};
pub use preview::{clip, render, render_default, Preview, PreviewTemplate, CLIP_LENGTH};
pub use session::{Claims, Role, Session, TokenPair};
pub use wizard::{AuthoringWizard, DraftField, QuizSummary, QuizWizard, Stage, WizardError};
