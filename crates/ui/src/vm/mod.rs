mod dashboard_vm;
mod format;
mod markdown_vm;
mod material_vm;
mod quiz_vm;
mod stats_vm;
mod time_fmt;

pub use dashboard_vm::{MaterialOverviewRowVm, MaterialStatsVm, OverviewVm, UserDashboardVm};
pub use format::{
    PALETTE, clamp_width, palette_color, percent_detail, percent_headline, share_width,
};
pub use markdown_vm::{markdown_to_html, normalize_markdown, sanitize_html};
pub use material_vm::{
    FlashcardVm, MaterialVm, MindmapBranchVm, MindmapVm, MockQuestionVm, MockSectionVm,
    MockTestVm, VideoCardVm, map_answer_html, map_videos, parse_mark_pattern,
};
pub use quiz_vm::{OptionState, QuizIntent, QuizOptionVm, QuizQuestionVm, QuizResultVm, QuizVm};
pub use stats_vm::{
    DONUT_RADIUS, DonutSegmentVm, DonutVm, RevisionBannerVm, StatCardVm, TrendBarVm,
    WeakQuestionRowVm, map_attempt_trend, map_daily_trend, map_donut, map_overall_cards,
    map_revision_banner, map_weak_questions,
};
