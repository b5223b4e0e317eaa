//! Text rendering of lookup results.

use colored::Colorize;
use std::fmt::Write;
use tsdoc_lookup::{
    ExportListing, Location, LookupOutput, MemberDescription, SignatureDescription, SymbolDescription,
};

pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Renderer { color }
    }

    pub fn render(&self, output: &LookupOutput) -> String {
        match output {
            LookupOutput::Symbol(description) => self.render_symbol(description),
            LookupOutput::Exports(listing) => self.render_exports(listing),
        }
    }

    // =========================================================================
    // Styling
    // =========================================================================

    fn title(&self, name: &str, kind: &str) -> String {
        if self.color {
            format!("{} {}", name.bold(), format!("({kind})").cyan())
        } else {
            format!("{name} ({kind})")
        }
    }

    fn heading(&self, text: &str) -> String {
        if self.color {
            text.yellow().bold().to_string()
        } else {
            text.to_string()
        }
    }

    fn dim(&self, text: &str) -> String {
        if self.color {
            text.dimmed().to_string()
        } else {
            text.to_string()
        }
    }

    fn location(&self, location: Option<&Location>) -> Option<String> {
        location.map(|l| self.dim(&format!("{}:{}", l.file, l.line)))
    }

    fn section(&self, out: &mut String, heading: &str, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        let _ = writeln!(out, "\n{}", self.heading(heading));
        for line in lines {
            for (i, part) in line.lines().enumerate() {
                let indent = if i == 0 { "  " } else { "    " };
                let _ = writeln!(out, "{indent}{part}");
            }
        }
    }

    // =========================================================================
    // Symbols
    // =========================================================================

    fn signature_lines(&self, name: &str, signature: &SignatureDescription) -> Vec<String> {
        // Construct signatures already read `new (...)`
        let head = if signature.text.starts_with("new ") {
            signature.text.clone()
        } else {
            format!("{name}{}", signature.text)
        };
        let mut lines = vec![head];
        for parameter in &signature.parameters {
            let mut line = format!("    {}", parameter.name);
            if let Some(default) = &parameter.default_value {
                let _ = write!(line, " = {default}");
            }
            if let Some(doc) = &parameter.doc {
                let _ = write!(line, " - {doc}");
            }
            if parameter.default_value.is_some() || parameter.doc.is_some() {
                lines.push(line);
            }
        }
        if let Some(returns) = &signature.returns_doc {
            lines.push(format!("    returns {returns}"));
        }
        lines
    }

    fn member_line(&self, member: &MemberDescription) -> String {
        let mut line = String::new();
        if member.static_ {
            line.push_str("static ");
        }
        if member.readonly {
            line.push_str("readonly ");
        }
        line.push_str(&member.name);
        if member.optional {
            line.push('?');
        }
        // Methods print as `name(params): R`, everything else as `name: T`
        if !member.type_text.starts_with(['(', '<']) {
            line.push_str(": ");
        }
        line.push_str(&member.type_text);
        if let Some(summary) = &member.summary {
            let _ = write!(line, "  {}", self.dim(&format!("// {summary}")));
        }
        line
    }

    pub fn render_symbol(&self, description: &SymbolDescription) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title(&description.name, description.kind.as_str()));
        if let Some(location) = self.location(description.location.as_ref()) {
            let _ = writeln!(out, "{location}");
        }
        if description.deprecated {
            let note = match &description.deprecation_note {
                Some(note) => format!("Deprecated: {note}"),
                None => "Deprecated".to_string(),
            };
            let note = if self.color { note.red().bold().to_string() } else { note };
            let _ = writeln!(out, "\n{note}");
        }
        if !description.documentation.is_empty() {
            let _ = writeln!(out, "\n{}", description.documentation);
        }

        let signatures: Vec<String> = description
            .construct_signatures
            .iter()
            .chain(&description.call_signatures)
            .flat_map(|s| self.signature_lines(&description.name, s))
            .collect();
        self.section(&mut out, "Signatures", &signatures);

        if let Some(type_text) = &description.type_text {
            self.section(&mut out, "Type", std::slice::from_ref(type_text));
        }

        let type_parameters: Vec<String> = description
            .call_signatures
            .iter()
            .chain(&description.construct_signatures)
            .flat_map(|s| &s.type_parameters)
            .map(|tp| {
                let mut line = tp.name.clone();
                if let Some(constraint) = &tp.constraint {
                    let _ = write!(line, " extends {constraint}");
                }
                if let Some(default) = &tp.default {
                    let _ = write!(line, " = {default}");
                }
                line
            })
            .fold(Vec::new(), |mut seen, line| {
                if !seen.contains(&line) {
                    seen.push(line);
                }
                seen
            });
        self.section(&mut out, "Type parameters", &type_parameters);

        if let Some(since) = &description.since {
            self.section(&mut out, "Since", std::slice::from_ref(since));
        }
        self.section(&mut out, "Throws", &description.throws);
        self.section(&mut out, "Examples", &description.examples);
        self.section(&mut out, "See", &description.see);
        self.section(&mut out, "Tags", &description.other_tags);

        let mut members: Vec<String> = description.members.iter().map(|m| self.member_line(m)).collect();
        if description.more_members > 0 {
            members.push(self.dim(&format!("... and {} more", description.more_members)));
        }
        self.section(&mut out, "Members", &members);
        out
    }

    // =========================================================================
    // Export listings
    // =========================================================================

    pub fn render_exports(&self, listing: &ExportListing) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", self.title(&listing.name, "module"));
        if let Some(location) = self.location(listing.location.as_ref()) {
            let _ = writeln!(out, "{location}");
        }
        let width = listing.exports.iter().map(|e| e.name.len()).max().unwrap_or(0);
        let mut lines: Vec<String> = listing
            .exports
            .iter()
            .map(|export| {
                let mut line = format!("{:<width$}  {:<12}", export.name, export.kind.as_str());
                if let Some(summary) = &export.summary {
                    line.push_str(&self.dim(summary));
                }
                line.trim_end().to_string()
            })
            .collect();
        if listing.more_exports > 0 {
            lines.push(self.dim(&format!("... and {} more", listing.more_exports)));
        }
        if lines.is_empty() {
            lines.push(self.dim("(no exports)"));
        }
        self.section(&mut out, "Exports", &lines);
        out
    }
}
