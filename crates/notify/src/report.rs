use intake_core::ContactSubmission;

/// Which way the intake run ended. Decides the report header only; the
/// labeled field lines are identical in both variants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutcomeKind {
    Success,
    Failure,
}

const SUCCESS_HEADER: &str = "新規のお問い合わせがありました。";
const FAILURE_HEADER: &str = "サーバーエラーが発生しました。";
const FAILURE_LEAD: &str = "以下のお問い合わせ内容の処理に失敗しました。";

/// Renders the chat report for one submission. Pure and deterministic:
/// the same submission and outcome kind always produce the same text,
/// and nothing time- or environment-dependent is included.
pub fn render(kind: OutcomeKind, submission: &ContactSubmission) -> String {
    let mut lines = Vec::with_capacity(9);

    match kind {
        OutcomeKind::Success => lines.push(SUCCESS_HEADER.to_string()),
        OutcomeKind::Failure => {
            lines.push(FAILURE_HEADER.to_string());
            lines.push(FAILURE_LEAD.to_string());
        }
    }

    lines.push(format!("お名前: {}", submission.name));
    lines.push(format!("メールアドレス: {}", submission.email));
    lines.push(format!("電話番号: {}", submission.phone));
    lines.push(format!("会社名: {}", submission.organization_name));
    lines.push(format!("ご予算: {}", submission.budget));
    lines.push("お問い合わせ内容:".to_string());
    lines.push(submission.contact_body.clone());

    lines.join("\n")
}
