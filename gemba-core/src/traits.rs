/// Turns one raw model answer into a judgment.
///
/// Implementations are pure: they hold no mutable state and return `None`
/// whenever the answer cannot be interpreted with confidence.
pub trait AnswerParser: Send + Sync {
    type Output;

    fn parse(&self, answer: &str) -> Option<Self::Output>;
}
