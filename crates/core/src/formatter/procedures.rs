use super::Formatter;
use crate::ast::{
    Annotation, Block, Clause, EvaluateClause, Expression, OnClause, Procedure, Recipient, Statement,
};

impl Formatter {
    // -- Procedures ---------------------------------------------

    pub(super) fn procedure(&mut self, procedure: &Procedure) {
        if procedure.statements().is_empty() {
            self.append("{ }");
            return;
        }
        self.append("{");
        self.indented(|formatter| {
            for statement in procedure.statements() {
                formatter.newline();
                formatter.statement(statement);
            }
        });
        self.newline();
        self.append("}");
    }

    fn statement(&mut self, statement: &Statement) {
        let mut written = false;
        if let Some(annotation) = statement.annotation() {
            self.annotation(annotation);
            written = true;
            // a one-line note would swallow a trailing note on the same line
            let note_follows = matches!(annotation, Annotation::Note(_)) && statement.note().is_some();
            if statement.main_clause().is_some() || note_follows {
                self.newline();
                written = statement.main_clause().is_some();
            }
        }
        if let Some(clause) = statement.main_clause() {
            self.clause(clause);
            if let Some(on_clause) = statement.on_clause() {
                self.append(" ");
                self.on_clause(on_clause);
            }
        }
        if let Some(note) = statement.note() {
            if written {
                self.append("  ");
            }
            self.append("! ");
            self.append(note);
        }
    }

    fn annotation(&mut self, annotation: &Annotation) {
        match annotation {
            Annotation::Note(text) => {
                self.append("! ");
                self.append(text);
            }
            Annotation::Comment(text) => {
                self.append("!>");
                self.block_lines(text);
                self.newline();
                self.append("<!");
            }
        }
    }

    // -- Clauses ------------------------------------------------

    fn clause(&mut self, clause: &Clause) {
        match clause {
            Clause::Accept { message } => self.keyword_clause("accept", message),
            Clause::Break => self.append("break loop"),
            Clause::Checkout {
                recipient,
                level,
                moniker,
            } => {
                self.append("checkout ");
                self.recipient(recipient);
                if let Some(level) = level {
                    self.append(" at level ");
                    self.expression(level);
                }
                self.append(" from ");
                self.expression(moniker);
            }
            Clause::Continue => self.append("continue loop"),
            Clause::Discard { document } => self.keyword_clause("discard", document),
            Clause::Evaluate(evaluate) => self.evaluate_clause(evaluate),
            Clause::If(block) => {
                self.append("if ");
                self.block(block);
            }
            Clause::Notarize { document, moniker } => {
                self.keyword_clause("notarize", document);
                self.append(" as ");
                self.expression(moniker);
            }
            Clause::Post { message, bag } => {
                self.keyword_clause("post", message);
                self.append(" to ");
                self.expression(bag);
            }
            Clause::Publish { event } => self.keyword_clause("publish", event),
            Clause::Reject { message } => self.keyword_clause("reject", message),
            Clause::Retrieve { recipient, bag } => {
                self.append("retrieve ");
                self.recipient(recipient);
                self.append(" from ");
                self.expression(bag);
            }
            Clause::Return { result } => self.keyword_clause("return", result),
            Clause::Save {
                document,
                recipient,
            } => {
                self.keyword_clause("save", document);
                self.append(" as ");
                self.recipient(recipient);
            }
            Clause::Select(select) => {
                self.keyword_clause("select", select.target());
                self.matching_blocks(select.blocks());
            }
            Clause::Throw { exception } => self.keyword_clause("throw", exception),
            Clause::While(block) => {
                self.append("while ");
                self.block(block);
            }
            Clause::With { item, block } => {
                self.append("with each ");
                self.append(&item.to_string());
                self.append(" in ");
                self.block(block);
            }
        }
    }

    fn keyword_clause(&mut self, keyword: &str, operand: &Expression) {
        self.append(keyword);
        self.append(" ");
        self.expression(operand);
    }

    fn evaluate_clause(&mut self, evaluate: &EvaluateClause) {
        if let Some((recipient, operator)) = &evaluate.assignment {
            self.recipient(recipient);
            self.append(" ");
            self.append(operator.as_str());
            self.append(" ");
        }
        self.expression(&evaluate.expression);
    }

    fn on_clause(&mut self, on_clause: &OnClause) {
        self.append("on ");
        self.append(&on_clause.exception().to_string());
        self.matching_blocks(on_clause.blocks());
    }

    fn matching_blocks(&mut self, blocks: &[Block]) {
        for block in blocks {
            self.append(" matching ");
            self.block(block);
        }
    }

    /// `expression do procedure`
    fn block(&mut self, block: &Block) {
        self.expression(&block.expression);
        self.append(" do ");
        self.procedure(&block.procedure);
    }

    fn recipient(&mut self, recipient: &Recipient) {
        match recipient {
            Recipient::Symbol(symbol) => self.append(&symbol.to_string()),
            Recipient::Attribute(attribute) => {
                self.append(attribute.variable());
                self.indices(attribute.indices());
            }
        }
    }
}
