use super::config::{CategoryRules, ClassifierRules};
use crate::workflows::edits::domain::{
    EditIntentRecord, EvidenceHit, EvidenceSource, ReferenceRecord, RegistryStatus, VerdictTier,
};
use crate::workflows::text::{collapse_whitespace, contains_any};

/// Lower-cased, trimmed view of one feed row and its registry match.
pub(crate) struct RowContext<'a> {
    pub code: &'a str,
    pub intent: &'a EditIntentRecord,
    pub record: &'a ReferenceRecord,
    pub memo: String,
    pub comments: String,
    pub plan: Option<String>,
}

impl<'a> RowContext<'a> {
    pub fn new(code: &'a str, intent: &'a EditIntentRecord, record: &'a ReferenceRecord) -> Self {
        Self {
            code,
            intent,
            record,
            memo: record.memo.trim().to_lowercase(),
            comments: intent.comments.trim().to_lowercase(),
            plan: intent
                .plan_number
                .as_deref()
                .map(|plan| plan.trim().to_lowercase())
                .filter(|plan| !plan.is_empty()),
        }
    }

    fn plan_label(&self) -> &str {
        self.intent.plan_number.as_deref().unwrap_or("N/A")
    }
}

pub(crate) struct Verdict {
    pub tier: VerdictTier,
    pub outcome: String,
    pub evidence: Vec<EvidenceHit>,
}

impl Verdict {
    fn new(tier: VerdictTier, outcome: String, evidence: Vec<EvidenceHit>) -> Self {
        Self {
            tier,
            outcome,
            evidence,
        }
    }
}

/// Keyword and plan-number hits for one text source.
fn support(
    ctx: &RowContext<'_>,
    rules: &CategoryRules,
    text: &str,
    keywords: &[String],
    source: EvidenceSource,
) -> Vec<EvidenceHit> {
    let mut hits: Vec<EvidenceHit> = keywords
        .iter()
        .filter(|keyword| !keyword.is_empty() && text.contains(keyword.as_str()))
        .map(|keyword| EvidenceHit::new(source, format!("keyword '{keyword}'")))
        .collect();

    if rules.match_plan_number {
        if let Some(plan) = ctx.plan.as_deref() {
            if text.contains(plan) {
                hits.push(EvidenceHit::new(source, format!("plan number '{plan}'")));
            }
        }
    }

    hits
}

fn memo_and_comment_support(
    ctx: &RowContext<'_>,
    rules: &CategoryRules,
) -> (Vec<EvidenceHit>, Vec<EvidenceHit>) {
    let memo = support(ctx, rules, &ctx.memo, &rules.memo_keywords, EvidenceSource::Memo);
    let comments = support(
        ctx,
        rules,
        &ctx.comments,
        &rules.comment_keywords,
        EvidenceSource::Comments,
    );
    (memo, comments)
}

fn status_hit(status: RegistryStatus) -> EvidenceHit {
    EvidenceHit::new(
        EvidenceSource::Status,
        format!("registry status {}", status.label()),
    )
}

pub(crate) fn new_entity(ctx: &RowContext<'_>, rules: &CategoryRules) -> Verdict {
    let (memo_hits, comment_hits) = memo_and_comment_support(ctx, rules);
    let memo_confirms = !memo_hits.is_empty();
    let comments_confirm = !comment_hits.is_empty();
    let mut evidence = memo_hits;
    evidence.extend(comment_hits);
    let code = ctx.code;

    if memo_confirms {
        if ctx.record.is_active() {
            Verdict::new(
                VerdictTier::Ok,
                format!(
                    "New/Related entity ({code}) aligns with registry memo (activity for plan {}).",
                    ctx.plan_label()
                ),
                evidence,
            )
        } else {
            evidence.push(status_hit(ctx.record.status));
            Verdict::new(
                VerdictTier::Review,
                format!("New/Related entity ({code}) but the registry record is Inactive."),
                evidence,
            )
        }
    } else if comments_confirm {
        Verdict::new(
            VerdictTier::Ok,
            format!(
                "New/Related entity ({code}) aligns with feed comments (activity for plan {}); registry memo does not explicitly confirm.",
                ctx.plan_label()
            ),
            evidence,
        )
    } else {
        Verdict::new(
            VerdictTier::NeedsReview,
            format!(
                "New/Related entity ({code}): registry memo and feed comments do not clearly confirm."
            ),
            evidence,
        )
    }
}

pub(crate) fn address_change(
    ctx: &RowContext<'_>,
    rules: &CategoryRules,
    marker: &str,
) -> Verdict {
    let proposed = ctx.intent.address.proposed_address();
    let registry_address = collapse_whitespace(&ctx.record.address).to_lowercase();
    let address_matches = !proposed.is_empty() && proposed == registry_address;

    let (memo_hits, comment_hits) = memo_and_comment_support(ctx, rules);
    let memo_confirms = !memo_hits.is_empty();
    let comments_confirm = !comment_hits.is_empty();
    let mut evidence = memo_hits;
    evidence.extend(comment_hits);
    if address_matches {
        evidence.push(EvidenceHit::new(
            EvidenceSource::Address,
            format!("registry address equals proposed '{proposed}'"),
        ));
    }
    let code = ctx.code;

    if memo_confirms {
        if address_matches {
            return Verdict::new(
                VerdictTier::Ok,
                format!(
                    "Address change ({code}) reflected in registry (address and memo agree on '{proposed}')."
                ),
                evidence,
            );
        }

        let previous = ctx
            .intent
            .reference_value
            .as_deref()
            .map(|value| collapse_whitespace(value).to_lowercase())
            .filter(|value| !value.is_empty());
        if let Some(previous) = previous {
            if !marker.is_empty() && ctx.memo.contains(marker) && ctx.memo.contains(&previous) {
                evidence.push(EvidenceHit::new(
                    EvidenceSource::Memo,
                    format!("previous address '{previous}' recorded"),
                ));
                return Verdict::new(
                    VerdictTier::Ok,
                    format!(
                        "Address change ({code}) from '{previous}' to '{proposed}' supported by registry memo."
                    ),
                    evidence,
                );
            }
        }

        Verdict::new(
            VerdictTier::Ok,
            format!(
                "Address change ({code}) supported by registry memo; compare feed address '{proposed}' with registry address '{registry_address}'."
            ),
            evidence,
        )
    } else if comments_confirm {
        Verdict::new(
            VerdictTier::Ok,
            format!(
                "Address change ({code}) aligns with feed comments; registry memo does not explicitly confirm."
            ),
            evidence,
        )
    } else {
        Verdict::new(
            VerdictTier::NeedsReview,
            format!(
                "Address change ({code}): registry memo and feed comments do not clearly confirm."
            ),
            evidence,
        )
    }
}

pub(crate) fn retirement(ctx: &RowContext<'_>, rules: &CategoryRules) -> Verdict {
    let (memo_hits, comment_hits) = memo_and_comment_support(ctx, rules);
    let memo_confirms = !memo_hits.is_empty();
    let comments_confirm = !comment_hits.is_empty();
    let mut evidence = vec![status_hit(ctx.record.status)];
    evidence.extend(memo_hits);
    evidence.extend(comment_hits);
    let code = ctx.code;

    match ctx.record.status {
        RegistryStatus::Inactive if memo_confirms => Verdict::new(
            VerdictTier::Ok,
            format!("Retirement ({code}) aligns with Inactive status and registry memo."),
            evidence,
        ),
        RegistryStatus::Inactive => Verdict::new(
            VerdictTier::Ok,
            format!(
                "Retirement ({code}) aligns with Inactive status; registry memo is less specific on the reason."
            ),
            evidence,
        ),
        RegistryStatus::Active if memo_confirms => Verdict::new(
            VerdictTier::Review,
            format!(
                "Retirement ({code}): registry status is ACTIVE but the memo suggests retirement. Check status."
            ),
            evidence,
        ),
        RegistryStatus::Active if comments_confirm => Verdict::new(
            VerdictTier::Review,
            format!(
                "Retirement ({code}) per feed comments, but registry status is ACTIVE and the memo does not confirm."
            ),
            evidence,
        ),
        RegistryStatus::Active => Verdict::new(
            VerdictTier::NeedsReview,
            format!(
                "Retirement ({code}): registry status is ACTIVE; memo and feed comments do not clearly confirm."
            ),
            evidence,
        ),
    }
}

pub(crate) fn no_change(ctx: &RowContext<'_>, rules: &CategoryRules) -> Verdict {
    let code = ctx.code;
    if ctx.memo.is_empty() {
        return Verdict::new(
            VerdictTier::Ok,
            format!("No change ({code}); registry holds no memo for this property."),
            Vec::new(),
        );
    }

    match contains_any(&ctx.memo, &rules.memo_keywords) {
        None => Verdict::new(
            VerdictTier::Ok,
            format!("No change ({code}) aligns with an uneventful registry memo."),
            Vec::new(),
        ),
        Some(conflict) => Verdict::new(
            VerdictTier::Review,
            format!(
                "No change ({code}), but the registry memo mentions '{conflict}'. Verify whether it is related."
            ),
            vec![EvidenceHit::new(
                EvidenceSource::Memo,
                format!("conflicting keyword '{conflict}'"),
            )],
        ),
    }
}

pub(crate) fn reference_update(ctx: &RowContext<'_>, rules: &CategoryRules) -> Verdict {
    let code = ctx.code;
    match contains_any(&ctx.comments, &rules.comment_keywords) {
        Some(keyword) => Verdict::new(
            VerdictTier::Ok,
            format!("Crefno update ({code}) noted in feed comments. Usually minor."),
            vec![EvidenceHit::new(
                EvidenceSource::Comments,
                format!("keyword '{keyword}'"),
            )],
        ),
        None => Verdict::new(
            VerdictTier::Review,
            format!("Crefno update ({code}): feed comments are unclear."),
            Vec::new(),
        ),
    }
}

/// Token-overlap heuristic for codes outside every known family.
pub(crate) fn unclassified(ctx: &RowContext<'_>, config: &ClassifierRules) -> Verdict {
    let code = ctx.code;
    if ctx.comments.chars().count() <= config.min_comment_chars {
        return Verdict::new(
            VerdictTier::NeedsGeneralReview,
            format!("Edit code {code}: no or brief feed comments."),
            Vec::new(),
        );
    }

    let shared = ctx
        .comments
        .split_whitespace()
        .filter(|token| token.chars().count() > config.min_token_chars)
        .find(|token| ctx.memo.contains(token));

    match shared {
        Some(token) => Verdict::new(
            VerdictTier::Ok,
            format!(
                "Edit code {code}: feed comment may align with registry memo (shared term '{token}')."
            ),
            vec![EvidenceHit::new(
                EvidenceSource::Comments,
                format!("term '{token}' also in memo"),
            )],
        ),
        None => Verdict::new(
            VerdictTier::Review,
            format!("Edit code {code}: feed comment and registry memo may differ or lack detail."),
            Vec::new(),
        ),
    }
}
