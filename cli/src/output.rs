use colored::*;
use mindmirror_core::prompt::ASSISTANT_NAME;
use mindmirror_core::{BigFiveTrait, ConversationTurn, Role, ScoreVector};
use pulldown_cmark::{Event as MdEvent, HeadingLevel, Options, Parser as MdParser, Tag};

const BAR_WIDTH: usize = 30;

/// Print the five score bars
pub fn print_score_bars(scores: &ScoreVector) {
    println!("{}", "Your Big Five Snapshot".bold());
    let label_width = BigFiveTrait::ALL
        .iter()
        .map(|t| t.label().len())
        .max()
        .unwrap_or(0);

    for (name, _) in scores.iter() {
        let pct = scores.percent(name);
        let bar = colorize_bar(name, &score_bar(pct, BAR_WIDTH));
        println!(
            "  {:<width$}  {} {:>3}%",
            name.label(),
            bar,
            pct,
            width = label_width
        );
    }
    println!();
}

/// Filled/empty cells for a percentage, always `width` characters long
pub fn score_bar(percent: u8, width: usize) -> String {
    let filled = (usize::from(percent.min(100)) * width + 50) / 100;
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

fn colorize_bar(name: BigFiveTrait, bar: &str) -> ColoredString {
    match name {
        BigFiveTrait::Openness => bar.bright_blue(),
        BigFiveTrait::Conscientiousness => bar.blue(),
        BigFiveTrait::Extraversion => bar.green(),
        BigFiveTrait::Agreeableness => bar.cyan(),
        BigFiveTrait::Neuroticism => bar.magenta(),
    }
}

/// Print the generated report, rendered for the terminal
pub fn print_report(report: &str) {
    println!("{}", "Your Personalized Report".bold());
    println!("{}", render_markdown(report));
}

pub fn print_chat_turn(turn: &ConversationTurn) {
    match turn.role {
        Role::User => println!("{}: {}", "You".green().bold(), turn.text()),
        Role::Model => println!(
            "{}: {}",
            ASSISTANT_NAME.blue().bold(),
            render_markdown(&turn.text()).trim()
        ),
    }
}

/// Blocking error box shown when an analysis fails
pub fn print_error_box(message: &str) {
    let rule = "─".repeat(50);
    eprintln!("{}", rule.red());
    eprintln!("{}", "Something went wrong".red().bold());
    eprintln!("{}", message);
    eprintln!("{}", rule.red());
}

pub fn print_no_report() {
    println!("{}", "Please generate a report first.".yellow().bold());
    println!("Your chat with {} is based on your personalized report.", ASSISTANT_NAME);
}

/// Show usage instructions when no text or action is provided
pub fn print_usage_instructions() {
    println!("{}", "Usage:".yellow().bold());
    println!("  {}", "mindmirror \"a few paragraphs of your writing\"".green().bold());
    println!("    Analyze the text and print your personality report");
    println!();
    println!("  {}", "mindmirror --file essay.txt -i".green().bold());
    println!("    Analyze a file, then chat with {} about the report", ASSISTANT_NAME);
    println!();
    println!("{}", "Options:".cyan());
    println!("  --config <PATH>   Config file (default ~/.config/mindmirror/config.toml)");
    println!("  --api-key <KEY>   Gemini API key (or GEMINI_API_KEY)");
    println!("  --help            Show this help message");
    println!();
}

/// Render markdown in the terminal
pub fn render_markdown(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);

    let parser = MdParser::new_ext(markdown, options);

    let mut output = String::new();
    let mut in_code_block = false;
    let mut in_strong = false;
    let mut list_depth: usize = 0;

    for event in parser {
        match event {
            MdEvent::Start(Tag::Heading(level, ..)) => {
                if !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
                match level {
                    HeadingLevel::H1 => output.push_str(&format!("{} ", "#".bright_cyan().bold())),
                    HeadingLevel::H2 => output.push_str(&format!("{} ", "##".bright_cyan().bold())),
                    _ => output.push_str(&format!("{} ", "###".cyan())),
                }
            }
            MdEvent::End(Tag::Heading(..)) => {
                output.push('\n');
            }
            MdEvent::Start(Tag::Paragraph) => {
                if list_depth == 0 && !output.is_empty() && !output.ends_with("\n\n") {
                    output.push('\n');
                }
            }
            MdEvent::End(Tag::Paragraph) => {
                if list_depth == 0 {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::CodeBlock(_)) => {
                in_code_block = true;
                output.push('\n');
            }
            MdEvent::End(Tag::CodeBlock(_)) => {
                in_code_block = false;
                output.push('\n');
            }
            MdEvent::Start(Tag::List(_)) => {
                if list_depth == 0 && !output.is_empty() && !output.ends_with('\n') {
                    output.push('\n');
                }
                list_depth += 1;
            }
            MdEvent::End(Tag::List(_)) => {
                list_depth = list_depth.saturating_sub(1);
            }
            MdEvent::Start(Tag::Item) => {
                let indent = "  ".repeat(list_depth.saturating_sub(1));
                output.push_str(&format!("{}{}  ", indent, "•".yellow()));
            }
            MdEvent::End(Tag::Item) => {
                if !output.ends_with('\n') {
                    output.push('\n');
                }
            }
            MdEvent::Start(Tag::Strong) => in_strong = true,
            MdEvent::End(Tag::Strong) => in_strong = false,
            MdEvent::Code(ref code) => {
                output.push_str(&format!("`{}`", code.on_bright_black().white()));
            }
            MdEvent::Text(ref text) => {
                if in_code_block {
                    output.push_str(&text.dimmed().to_string());
                } else if in_strong {
                    output.push_str(&text.bold().to_string());
                } else {
                    output.push_str(text);
                }
            }
            MdEvent::SoftBreak => output.push(' '),
            MdEvent::HardBreak => output.push('\n'),
            MdEvent::Rule => {
                output.push_str(&"─".repeat(40).dimmed().to_string());
                output.push('\n');
            }
            _ => {}
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar_width_and_fill() {
        assert_eq!(score_bar(0, 10), "░".repeat(10));
        assert_eq!(score_bar(100, 10), "█".repeat(10));
        assert_eq!(score_bar(50, 10), format!("{}{}", "█".repeat(5), "░".repeat(5)));
        assert_eq!(score_bar(200, 4).chars().count(), 4);
    }

    #[test]
    fn test_render_markdown_keeps_text() {
        colored::control::set_override(false);
        let rendered = render_markdown("# Your Report\n\nYou are **curious**.\n\n- Openness\n- Focus\n");
        assert!(rendered.contains("# Your Report"));
        assert!(rendered.contains("You are curious."));
        assert!(rendered.contains("•  Openness\n"));
        assert!(rendered.contains("•  Focus\n"));
    }
}
