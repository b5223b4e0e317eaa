use tsdoc_scanner::{ScannerState, SyntaxKind};

fn scan_all(source: &str) -> Vec<SyntaxKind> {
    let mut scanner = ScannerState::new(source.to_string(), true);
    let mut kinds = Vec::new();
    loop {
        let kind = scanner.scan();
        if kind == SyntaxKind::EndOfFileToken {
            break;
        }
        kinds.push(kind);
    }
    kinds
}

#[test]
fn test_scan_empty() {
    let mut scanner = ScannerState::new(String::new(), true);
    assert_eq!(scanner.scan(), SyntaxKind::EndOfFileToken);
}

#[test]
fn test_scan_whitespace_skip() {
    let mut scanner = ScannerState::new("   foo".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::Identifier);
    assert_eq!(scanner.get_token_value(), "foo");
    assert_eq!(scanner.get_token_start(), 3);
}

#[test]
fn test_scan_punctuation() {
    assert_eq!(
        scan_all("{}()[];,"),
        vec![
            SyntaxKind::OpenBraceToken,
            SyntaxKind::CloseBraceToken,
            SyntaxKind::OpenParenToken,
            SyntaxKind::CloseParenToken,
            SyntaxKind::OpenBracketToken,
            SyntaxKind::CloseBracketToken,
            SyntaxKind::SemicolonToken,
            SyntaxKind::CommaToken,
        ]
    );
}

#[test]
fn test_nested_generic_closers_scan_separately() {
    assert_eq!(
        scan_all("Array<Array<T>>"),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanToken,
            SyntaxKind::Identifier,
            SyntaxKind::GreaterThanToken,
            SyntaxKind::GreaterThanToken,
        ]
    );
}

#[test]
fn test_scan_compound_operators() {
    assert_eq!(
        scan_all("=== !== => && || ?? ?. ..."),
        vec![
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::ExclamationEqualsEqualsToken,
            SyntaxKind::EqualsGreaterThanToken,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::BarBarToken,
            SyntaxKind::QuestionQuestionToken,
            SyntaxKind::QuestionDotToken,
            SyntaxKind::DotDotDotToken,
        ]
    );
}

#[test]
fn test_keywords_and_identifiers() {
    assert_eq!(
        scan_all("interface readonly declare foo"),
        vec![
            SyntaxKind::InterfaceKeyword,
            SyntaxKind::ReadonlyKeyword,
            SyntaxKind::DeclareKeyword,
            SyntaxKind::Identifier,
        ]
    );
    assert!(SyntaxKind::TypeKeyword.is_contextual_keyword());
    assert!(!SyntaxKind::ClassKeyword.is_contextual_keyword());
}

#[test]
fn test_scan_string_with_escapes() {
    let mut scanner = ScannerState::new("'it\\'s'".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::StringLiteral);
    assert_eq!(scanner.get_token_value(), "it's");
    assert_eq!(scanner.get_token_text(), "'it\\'s'");
}

#[test]
fn test_scan_numbers() {
    let mut scanner = ScannerState::new("0xFF 1_000.5e3 10n".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value(), "0xFF");
    assert_eq!(scanner.scan(), SyntaxKind::NumericLiteral);
    assert_eq!(scanner.get_token_value(), "1_000.5e3");
    assert_eq!(scanner.scan(), SyntaxKind::BigIntLiteral);
}

#[test]
fn test_template_with_substitution_is_one_token() {
    let kinds = scan_all("`a ${ {b: `c`}.b } d` ;");
    assert_eq!(
        kinds,
        vec![SyntaxKind::TemplateLiteral, SyntaxKind::SemicolonToken]
    );
}

#[test]
fn test_comments_are_recorded_once() {
    let source = "/** doc */\n// line\ninterface A {}";
    let mut scanner = ScannerState::new(source.to_string(), true);
    let snapshot = scanner.save_state();
    assert_eq!(scanner.scan(), SyntaxKind::InterfaceKeyword);
    assert!(scanner.has_preceding_line_break());
    scanner.restore_state(snapshot);
    assert_eq!(scanner.scan(), SyntaxKind::InterfaceKeyword);

    let comments = scanner.comments();
    assert_eq!(comments.len(), 2);
    assert!(comments[0].is_multi_line);
    assert!(!comments[1].is_multi_line);
    assert_eq!(comments[0].get_text(source), "/** doc */");
}

#[test]
fn test_rescan_regex() {
    let mut scanner = ScannerState::new("/[/}]+/g;".to_string(), true);
    assert_eq!(scanner.scan(), SyntaxKind::SlashToken);
    assert_eq!(
        scanner.rescan_slash_token(),
        SyntaxKind::RegularExpressionLiteral
    );
    assert_eq!(scanner.get_token_text(), "/[/}]+/g");
    assert_eq!(scanner.scan(), SyntaxKind::SemicolonToken);
}
