use super::Parser;
use crate::ast::{
    Annotation, AssignmentOperator, Attribute, Block, Clause, EvaluateClause, Expression,
    OnClause, Procedure, Recipient, SelectClause, Statement,
};
use crate::error::Error;
use crate::lexer::TokenKind;
use crate::literals::strings::block_lines;
use crate::literals::Symbol;

const PROCEDURE: &[&str] = &["$procedure", "$statements", "$statement"];
const STATEMENTS: &[&str] = &["$statements", "$statement"];
const BLOCK: &[&str] = &[
    "$ifClause",
    "$selectClause",
    "$withClause",
    "$whileClause",
    "$onClause",
];
const CHECKOUT: &[&str] = &[
    "$checkoutClause",
    "$recipient",
    "$name",
    "$attribute",
    "$variable",
    "$indices",
    "$ordinal",
    "$moniker",
];
const NOTARIZE: &[&str] = &["$notarizeClause", "$document", "$moniker"];
const POST: &[&str] = &["$postClause", "$message", "$bag"];
const RETRIEVE: &[&str] = &[
    "$retrieveClause",
    "$recipient",
    "$name",
    "$attribute",
    "$variable",
    "$indices",
    "$bag",
];
const SAVE: &[&str] = &[
    "$saveClause",
    "$document",
    "$recipient",
    "$name",
    "$attribute",
    "$variable",
    "$indices",
];
const WITH: &[&str] = &["$withClause", "$value", "$sequence"];

impl<'a> Parser<'a> {
    // -- Procedures ---------------------------------------------

    /// `"{" statements "}"`. A newline right after the brace commits to one
    /// statement per line; otherwise statements are separated by `;`.
    pub(super) fn parse_procedure(&mut self) -> Result<Option<Procedure>, Error> {
        if !self.take_delimiter("{") {
            return Ok(None);
        }
        let statements = if self.take_eol() {
            self.parse_multiline_statements()?
        } else {
            self.parse_inline_statements()?
        };
        if !self.take_delimiter("}") {
            return Err(self.violation("}", PROCEDURE));
        }
        Ok(Some(Procedure::new(statements)))
    }

    fn parse_inline_statements(&mut self) -> Result<Vec<Statement>, Error> {
        let mut statements = Vec::new();
        let Some(first) = self.parse_statement()? else {
            return Ok(statements);
        };
        statements.push(first);
        while self.take_delimiter(";") {
            let statement = self
                .parse_statement()?
                .ok_or_else(|| self.violation("$statement", STATEMENTS))?;
            statements.push(statement);
        }
        Ok(statements)
    }

    fn parse_multiline_statements(&mut self) -> Result<Vec<Statement>, Error> {
        let mut statements = Vec::new();
        while let Some(statement) = self.parse_statement()? {
            statements.push(statement);
            if !self.take_eol() {
                return Err(self.violation("EOL", STATEMENTS));
            }
        }
        Ok(statements)
    }

    // -- Statements ---------------------------------------------

    /// `[annotation EOL] [mainClause [onClause]] [NOTE]`. A note on a line of
    /// its own is kept as the statement's trailing note.
    fn parse_statement(&mut self) -> Result<Option<Statement>, Error> {
        let mut annotation = self.parse_annotation();
        let mut main_clause = None;
        if annotation.is_none() {
            main_clause = self.parse_main_clause()?;
        } else if self.take_eol() {
            main_clause = self.parse_main_clause()?;
            if main_clause.is_none() {
                self.stream.push_back();
            }
        }
        let on_clause = match main_clause {
            Some(_) => self.parse_on_clause()?,
            None => None,
        };
        let mut note = self.parse_note();
        if main_clause.is_none() && note.is_none() {
            if let Some(Annotation::Note(text)) = annotation {
                note = Some(text);
                annotation = None;
            }
        }

        if annotation.is_none() && main_clause.is_none() && note.is_none() {
            return Ok(None);
        }
        Ok(Some(Statement::from_parts(annotation, main_clause, on_clause, note)))
    }

    fn parse_annotation(&mut self) -> Option<Annotation> {
        if let Some(text) = self.take_kind(TokenKind::Comment) {
            return Some(Annotation::Comment(block_lines(&text, 0).join("\n")));
        }
        let text = self.take_kind(TokenKind::Note)?;
        Some(Annotation::Note(
            text.strip_prefix("! ").unwrap_or(&text).to_owned(),
        ))
    }

    fn parse_main_clause(&mut self) -> Result<Option<Clause>, Error> {
        if self.peek().kind != TokenKind::Keyword {
            return Ok(self.parse_evaluate_clause()?.map(Clause::Evaluate));
        }
        let keyword = self.peek().text.clone();
        let clause = match keyword.as_str() {
            "if" => self.parse_if_clause()?,
            "select" => self.parse_select_clause()?,
            "with" => self.parse_with_clause()?,
            "while" => self.parse_while_clause()?,
            "continue" => self.parse_loop_clause("continue", "$continueClause", Clause::Continue)?,
            "break" => self.parse_loop_clause("break", "$breakClause", Clause::Break)?,
            "return" => {
                let result = self.parse_keyword_operand("return", "$result", &["$returnClause", "$result"])?;
                Clause::Return { result }
            }
            "throw" => {
                let exception =
                    self.parse_keyword_operand("throw", "$exception", &["$throwClause", "$exception"])?;
                Clause::Throw { exception }
            }
            "save" => self.parse_save_clause()?,
            "discard" => {
                let document =
                    self.parse_keyword_operand("discard", "$document", &["$discardClause", "$document"])?;
                Clause::Discard { document }
            }
            "notarize" => self.parse_notarize_clause()?,
            "checkout" => self.parse_checkout_clause()?,
            "publish" => {
                let event = self.parse_keyword_operand("publish", "$event", &["$publishClause", "$event"])?;
                Clause::Publish { event }
            }
            "post" => self.parse_post_clause()?,
            "retrieve" => self.parse_retrieve_clause()?,
            "accept" => {
                let message =
                    self.parse_keyword_operand("accept", "$message", &["$acceptClause", "$message"])?;
                Clause::Accept { message }
            }
            "reject" => {
                let message =
                    self.parse_keyword_operand("reject", "$message", &["$rejectClause", "$message"])?;
                Clause::Reject { message }
            }
            _ => return Ok(None),
        };
        Ok(Some(clause))
    }

    /// An expression that must follow what has been read so far.
    fn expect_expression(&mut self, expected: &str, rules: &[&'static str]) -> Result<Expression, Error> {
        self.parse_expression()?
            .ok_or_else(|| self.violation(expected, rules))
    }

    fn expect_keyword(&mut self, keyword: &str, rules: &[&'static str]) -> Result<(), Error> {
        if self.take_keyword(keyword) {
            Ok(())
        } else {
            Err(self.violation(keyword, rules))
        }
    }

    fn expect_recipient(&mut self, rules: &[&'static str]) -> Result<Recipient, Error> {
        self.parse_recipient()?
            .ok_or_else(|| self.violation("$recipient", rules))
    }

    /// `keyword expression`
    fn parse_keyword_operand(
        &mut self,
        keyword: &str,
        expected: &str,
        rules: &[&'static str],
    ) -> Result<Expression, Error> {
        self.take_keyword(keyword);
        self.expect_expression(expected, rules)
    }

    // -- Control clauses ----------------------------------------

    /// `expression "do" procedure`, read after the clause keyword.
    fn parse_block(&mut self, expected: &str, rules: &[&'static str]) -> Result<Block, Error> {
        let expression = self.expect_expression(expected, rules)?;
        self.expect_keyword("do", BLOCK)?;
        let procedure = self
            .nested(|parser| parser.parse_procedure())?
            .ok_or_else(|| self.violation("$procedure", PROCEDURE))?;
        Ok(Block::new(expression, procedure))
    }

    /// Zero or more `"matching" block`.
    fn parse_matching_blocks(&mut self, rules: &[&'static str]) -> Result<Vec<Block>, Error> {
        let mut blocks = Vec::new();
        while self.take_keyword("matching") {
            blocks.push(self.parse_block("$pattern", rules)?);
        }
        Ok(blocks)
    }

    fn parse_if_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("if");
        let block = self.parse_block("$condition", &["$ifClause", "$condition", "$procedure"])?;
        Ok(Clause::If(block))
    }

    fn parse_while_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("while");
        let block = self.parse_block("$condition", &["$whileClause", "$condition", "$procedure"])?;
        Ok(Clause::While(block))
    }

    fn parse_with_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("with");
        self.expect_keyword("each", WITH)?;
        let item = self
            .take_kind(TokenKind::Symbol)
            .ok_or_else(|| self.violation("$value", WITH))?;
        let item: Symbol = item.parse()?;
        self.expect_keyword("in", WITH)?;
        let block = self.parse_block("$sequence", &["$withClause", "$value", "$sequence", "$procedure"])?;
        Ok(Clause::With { item, block })
    }

    fn parse_select_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("select");
        let target = self.expect_expression("$target", &["$selectClause", "$target", "$pattern"])?;
        let blocks =
            self.parse_matching_blocks(&["$selectClause", "$target", "$pattern", "$procedure"])?;
        if blocks.is_empty() {
            return Err(self.violation("$pattern", &["$selectClause", "$target", "$pattern"]));
        }
        Ok(Clause::Select(SelectClause::new(target, blocks)?))
    }

    fn parse_loop_clause(&mut self, keyword: &str, rule: &'static str, clause: Clause) -> Result<Clause, Error> {
        self.take_keyword(keyword);
        self.expect_keyword("loop", &[rule])?;
        Ok(clause)
    }

    /// `"on" $exception <"matching" pattern "do" procedure>`; at least one
    /// block is required once `on` has been read.
    fn parse_on_clause(&mut self) -> Result<Option<OnClause>, Error> {
        if !self.take_keyword("on") {
            return Ok(None);
        }
        let exception = self
            .take_kind(TokenKind::Symbol)
            .ok_or_else(|| self.violation("$exception", &["$onClause", "$exception", "$pattern", "$statements"]))?;
        let exception: Symbol = exception.parse()?;
        let rules = &["$onClause", "$exception", "$pattern", "$procedure"];
        let blocks = self.parse_matching_blocks(rules)?;
        if blocks.is_empty() {
            return Err(self.violation("$pattern", rules));
        }
        Ok(Some(OnClause::new(exception, blocks)?))
    }

    // -- Document and message clauses ---------------------------

    fn parse_save_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("save");
        let document = self.expect_expression("$document", SAVE)?;
        self.expect_keyword("as", SAVE)?;
        let recipient = self.expect_recipient(SAVE)?;
        Ok(Clause::Save { document, recipient })
    }

    fn parse_notarize_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("notarize");
        let document = self.expect_expression("$document", NOTARIZE)?;
        self.expect_keyword("as", NOTARIZE)?;
        let moniker = self.expect_expression("$moniker", NOTARIZE)?;
        Ok(Clause::Notarize { document, moniker })
    }

    fn parse_checkout_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("checkout");
        let recipient = self.expect_recipient(CHECKOUT)?;
        let level = if self.take_keyword("at") {
            self.expect_keyword("level", CHECKOUT)?;
            Some(self.expect_expression("$expression", CHECKOUT)?)
        } else {
            None
        };
        self.expect_keyword("from", CHECKOUT)?;
        let moniker = self.expect_expression("$moniker", CHECKOUT)?;
        Ok(Clause::Checkout {
            recipient,
            level,
            moniker,
        })
    }

    fn parse_post_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("post");
        let message = self.expect_expression("$message", POST)?;
        self.expect_keyword("to", POST)?;
        let bag = self.expect_expression("$bag", POST)?;
        Ok(Clause::Post { message, bag })
    }

    fn parse_retrieve_clause(&mut self) -> Result<Clause, Error> {
        self.take_keyword("retrieve");
        let recipient = self.expect_recipient(RETRIEVE)?;
        self.expect_keyword("from", RETRIEVE)?;
        let bag = self.expect_expression("$bag", RETRIEVE)?;
        Ok(Clause::Retrieve { recipient, bag })
    }

    // -- Evaluation ---------------------------------------------

    /// `[recipient operator] expression`. A recipient with no assignment
    /// operator after it is read again as the start of an expression.
    fn parse_evaluate_clause(&mut self) -> Result<Option<EvaluateClause>, Error> {
        let mark = self.stream.mark();
        if let Some(recipient) = self.parse_recipient()? {
            if let Some(operator) = self.take_operator(|_: AssignmentOperator| true) {
                let expression = self.expect_expression(
                    "$expression",
                    &["$evaluateClause", "$expression"],
                )?;
                return Ok(Some(EvaluateClause::assign(recipient, operator, expression)));
            }
            self.backtrack(mark, "$evaluateClause");
        }
        Ok(self.parse_expression()?.map(EvaluateClause::new))
    }

    /// `name | attribute`
    fn parse_recipient(&mut self) -> Result<Option<Recipient>, Error> {
        if let Some(name) = self.take_kind(TokenKind::Symbol) {
            return Ok(Some(Recipient::Symbol(name.parse()?)));
        }
        let mark = self.stream.mark();
        let Some(variable) = self.take_kind(TokenKind::Identifier) else {
            return Ok(None);
        };
        match self.parse_indices()? {
            Some(indices) => Ok(Some(Recipient::Attribute(Attribute::new(variable, indices)?))),
            None => {
                self.backtrack(mark, "$attribute");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Annotation, AssignmentOperator, Clause, Recipient};
    use crate::error::Error;
    use crate::parser::parse_procedure;

    fn clause(source: &str) -> Clause {
        let procedure = parse_procedure(source).unwrap();
        assert_eq!(procedure.statements().len(), 1);
        procedure.statements()[0].main_clause().cloned().unwrap()
    }

    fn violation(source: &str) -> (String, Vec<&'static str>) {
        match parse_procedure(source) {
            Err(Error::Grammar(violation)) => (violation.expected, violation.rules),
            other => panic!("expected a grammar violation, got {:?}", other),
        }
    }

    #[test]
    fn empty_procedures() {
        assert!(parse_procedure("{ }").unwrap().statements().is_empty());
        assert!(parse_procedure("{\n}").unwrap().statements().is_empty());
    }

    #[test]
    fn inline_statements_are_separated_by_semicolons() {
        let procedure = parse_procedure("{$x := 1; $y += $x; return $y}").unwrap();
        assert_eq!(procedure.statements().len(), 3);
    }

    #[test]
    fn evaluate_clauses_with_and_without_assignment() {
        let Clause::Evaluate(assigned) = clause("{$count += 1}") else {
            panic!("expected an evaluation");
        };
        let (recipient, operator) = assigned.assignment.unwrap();
        assert_eq!(operator, AssignmentOperator::Add);
        assert!(matches!(recipient, Recipient::Symbol(_)));

        let Clause::Evaluate(attribute) = clause("{list[1, -1] := none}") else {
            panic!("expected an evaluation");
        };
        assert!(matches!(attribute.assignment, Some((Recipient::Attribute(_), _))));

        let Clause::Evaluate(bare) = clause("{list[1].clear()}") else {
            panic!("expected an evaluation");
        };
        assert!(bare.assignment.is_none());
    }

    #[test]
    fn document_and_message_clauses() {
        assert!(matches!(clause("{save $doc as $citation}"), Clause::Save { .. }));
        assert!(matches!(clause("{notarize $doc as /acme/doc/v1}"), Clause::Notarize { .. }));
        assert!(matches!(
            clause("{checkout $doc at level 2 from /acme/doc}"),
            Clause::Checkout { level: Some(_), .. }
        ));
        assert!(matches!(
            clause("{checkout $doc from /acme/doc}"),
            Clause::Checkout { level: None, .. }
        ));
        assert!(matches!(clause("{post $message to /acme/bag}"), Clause::Post { .. }));
        assert!(matches!(clause("{retrieve $message from /acme/bag}"), Clause::Retrieve { .. }));
        assert!(matches!(clause("{publish $event}"), Clause::Publish { .. }));
        assert!(matches!(clause("{accept $message}"), Clause::Accept { .. }));
        assert!(matches!(clause("{reject $message}"), Clause::Reject { .. }));
        assert!(matches!(clause("{discard $doc}"), Clause::Discard { .. }));
    }

    #[test]
    fn control_clauses() {
        assert!(matches!(clause("{if $x = 1 do {break loop}}"), Clause::If(_)));
        assert!(matches!(clause("{while true do {continue loop}}"), Clause::While(_)));
        assert!(matches!(clause("{with each $item in $items do { }}"), Clause::With { .. }));
        let Clause::Select(select) = clause("{select $x matching 1 do {return 1} matching any do {return 2}}") else {
            panic!("expected a select clause");
        };
        assert_eq!(select.blocks().len(), 2);
        assert!(matches!(clause("{throw $exception}"), Clause::Throw { .. }));
    }

    #[test]
    fn on_clauses_attach_to_the_main_clause() {
        let procedure = parse_procedure("{$x := f() on $e matching any do {return none}}").unwrap();
        let on_clause = procedure.statements()[0].on_clause().unwrap();
        assert_eq!(on_clause.exception().name(), "e");
        assert_eq!(on_clause.blocks().len(), 1);
    }

    #[test]
    fn on_clause_without_blocks_names_pattern_and_procedure() {
        let (expected, rules) = violation("{$x := f() on $e}");
        assert_eq!(expected, "$pattern");
        assert_eq!(rules, vec!["$onClause", "$exception", "$pattern", "$procedure"]);
    }

    #[test]
    fn loop_clauses_need_the_loop_keyword() {
        assert_eq!(violation("{break}"), ("loop".to_owned(), vec!["$breakClause"]));
    }

    #[test]
    fn select_needs_a_block() {
        let (expected, rules) = violation("{select $x}");
        assert_eq!(expected, "$pattern");
        assert_eq!(rules, vec!["$selectClause", "$target", "$pattern"]);
    }

    #[test]
    fn annotations_and_notes() {
        let procedure = parse_procedure("{\n    ! first\n    $x := 1  ! set\n    !>\n    why\n    <!\n    ! alone\n}").unwrap();
        let statements = procedure.statements();
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].annotation(), Some(&Annotation::Note("first".to_owned())));
        assert_eq!(statements[0].note(), Some("set"));
        assert_eq!(statements[1].annotation(), Some(&Annotation::Comment("why".to_owned())));
        assert!(statements[1].main_clause().is_none());
        assert_eq!(statements[2].note(), Some("alone"));
        assert!(statements[2].annotation().is_none());
    }

    #[test]
    fn multiline_statements_need_newlines() {
        let (expected, _) = violation("{\n    return 1 return 2\n}");
        assert_eq!(expected, "EOL");
    }
}
