//! Terminal rendering of the pages.
pub mod prompt;
mod theme;

use comfy_table::{
    Attribute, Cell, CellAlignment, Table, modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL,
};
use engine::{
    Category, Directory, LoadMore, MoneyCents, Person, Totals, TotalsMismatch, Transaction,
    UserAccount, export::display_date,
};

pub use theme::Tone;

const UNRESOLVED: &str = "N/A";

#[derive(Debug, Clone, Copy)]
pub struct Renderer {
    color: bool,
}

impl Renderer {
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    fn table(&self, header: &[&str]) -> Table {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS);
        if self.color {
            table.enforce_styling();
        } else {
            table.force_no_tty();
        }
        let header: Vec<Cell> = header
            .iter()
            .map(|label| self.styled(Cell::new(label).add_attribute(Attribute::Bold), Tone::Plain))
            .collect();
        table.set_header(header);
        table
    }

    fn styled(&self, cell: Cell, tone: Tone) -> Cell {
        match tone.color() {
            Some(color) if self.color => cell.fg(color),
            _ => cell,
        }
    }

    fn amount(&self, amount: MoneyCents, tone: Tone) -> Cell {
        self.styled(
            Cell::new(amount).set_alignment(CellAlignment::Right),
            tone,
        )
    }

    pub fn people(&self, visible: &[Person], total: usize, pages: &LoadMore) -> String {
        if total == 0 {
            return "Nenhuma pessoa cadastrada.".to_string();
        }
        let mut table = self.table(&["ID", "NOME", "IDADE"]);
        for person in visible {
            table.add_row(vec![
                Cell::new(person.id),
                Cell::new(&person.name),
                Cell::new(person.age).set_alignment(CellAlignment::Right),
            ]);
        }
        format!("{table}\n{}", more_hint(visible.len(), total, pages))
    }

    pub fn categories(&self, categories: &[&Category]) -> String {
        if categories.is_empty() {
            return "Nenhuma categoria encontrada.".to_string();
        }
        let mut table = self.table(&["ID", "DESCRIÇÃO", "FINALIDADE"]);
        for category in categories {
            table.add_row(vec![
                Cell::new(category.id),
                Cell::new(&category.description),
                Cell::new(category.purpose.as_str()),
            ]);
        }
        table.to_string()
    }

    pub fn transactions(
        &self,
        visible: &[&Transaction],
        directory: &Directory<'_>,
        total: usize,
        pages: &LoadMore,
    ) -> String {
        if total == 0 {
            return "Nenhuma transação encontrada.".to_string();
        }
        let mut table = self.table(&[
            "DATA",
            "DESCRIÇÃO",
            "CATEGORIA",
            "RESPONSÁVEL",
            "VALOR",
            "STATUS",
        ]);
        for tx in visible {
            let status = if tx.paid {
                self.styled(Cell::new("PAGO"), Tone::Positive)
            } else {
                self.styled(Cell::new("PENDENTE"), Tone::Warning)
            };
            table.add_row(vec![
                Cell::new(display_date(tx.due_date)),
                Cell::new(&tx.description),
                Cell::new(
                    directory
                        .category_description(tx.category_id)
                        .unwrap_or(UNRESOLVED),
                ),
                Cell::new(directory.person_name(tx.person_id).unwrap_or(UNRESOLVED)),
                self.amount(tx.amount, Tone::of_kind(tx.kind)),
                status,
            ]);
        }
        format!("{table}\n{}", more_hint(visible.len(), total, pages))
    }

    pub fn users(&self, users: &[UserAccount]) -> String {
        if users.is_empty() {
            return "Nenhum usuário cadastrado.".to_string();
        }
        let mut table = self.table(&["ID", "NOME", "EMAIL", "CPF", "TELEFONE", "STATUS"]);
        for user in users {
            let status = if user.active {
                self.styled(Cell::new("ATIVO"), Tone::Positive)
            } else {
                self.styled(Cell::new("INATIVO"), Tone::Negative)
            };
            table.add_row(vec![
                Cell::new(user.id),
                Cell::new(&user.name),
                Cell::new(&user.email),
                Cell::new(&user.tax_id),
                Cell::new(&user.phone),
                status,
            ]);
        }
        table.to_string()
    }

    pub fn dashboard(
        &self,
        totals: &Totals,
        pending: &[&Transaction],
        mismatches: &[TotalsMismatch],
    ) -> String {
        let grand = &totals.grand;
        let risk = grand.risk();

        let mut summary = self.table(&["RESUMO", ""]);
        summary.add_row(vec![
            Cell::new("Receitas"),
            self.amount(grand.total_income, Tone::Positive),
        ]);
        summary.add_row(vec![
            Cell::new("Despesas"),
            self.amount(grand.total_expense, Tone::Negative),
        ]);
        summary.add_row(vec![
            Cell::new("Saldo"),
            self.amount(grand.balance, Tone::of_balance(grand.balance)),
        ]);
        summary.add_row(vec![
            Cell::new("Comprometido"),
            self.styled(
                Cell::new(format!(
                    "{} {}",
                    format_percentage(grand.commitment_percentage()),
                    risk.label()
                ))
                .set_alignment(CellAlignment::Right),
                Tone::of_risk(risk),
            ),
        ]);

        let mut out = summary.to_string();

        if !totals.per_person.is_empty() {
            let mut people = self.table(&["PESSOA", "RECEITAS", "DESPESAS", "SALDO"]);
            for person in &totals.per_person {
                people.add_row(vec![
                    Cell::new(&person.name),
                    self.amount(person.total_income, Tone::Positive),
                    self.amount(person.total_expense, Tone::Negative),
                    self.amount(person.balance, Tone::of_balance(person.balance)),
                ]);
            }
            out.push_str(&format!("\n{people}"));
        }

        if pending.is_empty() {
            out.push_str("\nNenhuma conta pendente.");
        } else {
            let mut bills = self.table(&["CONTA PENDENTE", "VENCIMENTO", "VALOR"]);
            for tx in pending {
                bills.add_row(vec![
                    Cell::new(&tx.description),
                    Cell::new(display_date(tx.due_date)),
                    self.amount(tx.amount, Tone::Negative),
                ]);
            }
            out.push_str(&format!("\n{bills}"));
        }

        if mismatches.is_empty() {
            out.push_str("\nConsistência dos totais: OK");
        } else {
            out.push_str(&format!(
                "\nConsistência dos totais: {} divergência(s)",
                mismatches.len()
            ));
            for mismatch in mismatches {
                out.push_str(&format!("\n  - {}", describe_mismatch(mismatch)));
            }
        }
        out
    }
}

/// `40,00%`, rounded up to the hundredth so anything above a risk boundary
/// never prints as the boundary itself.
pub fn format_percentage(percentage: f64) -> String {
    let hundredths = ((percentage * 100.0 - 1e-6).ceil() as i64).max(0);
    format!("{},{:02}%", hundredths / 100, hundredths % 100)
}

pub fn describe_mismatch(mismatch: &TotalsMismatch) -> String {
    match mismatch {
        TotalsMismatch::Grand {
            field,
            local,
            remote,
        } => format!(
            "total geral {}: calculado {local}, servidor {remote}",
            field.as_str()
        ),
        TotalsMismatch::Person {
            person_id,
            field,
            local,
            remote,
        } => format!(
            "pessoa {person_id} {}: calculado {local}, servidor {remote}",
            field.as_str()
        ),
        TotalsMismatch::MissingRemote { person_id } => {
            format!("pessoa {person_id} ausente nos totais do servidor")
        }
        TotalsMismatch::MissingLocal { person_id } => {
            format!("pessoa {person_id} desconhecida na lista de pessoas")
        }
    }
}

fn more_hint(shown: usize, total: usize, pages: &LoadMore) -> String {
    if pages.has_more(total) {
        format!(
            "Mostrando {shown} de {total}. Use --page {} para carregar mais.",
            pages.page() + 1
        )
    } else {
        format!("Mostrando {shown} de {total}.")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::{GrandTotal, PersonTotal, TotalField};

    #[test]
    fn percentage_uses_a_decimal_comma() {
        assert_eq!(format_percentage(40.0), "40,00%");
        assert_eq!(format_percentage(90.04), "90,04%");
        assert_eq!(format_percentage(0.0), "0,00%");
    }

    #[test]
    fn percentage_above_a_boundary_never_shows_the_boundary() {
        assert_eq!(format_percentage(90.0), "90,00%");
        assert_eq!(format_percentage(90.0001), "90,01%");
        assert_eq!(format_percentage(70.001), "70,01%");
    }

    #[test]
    fn hint_points_at_the_next_page() {
        let pages = LoadMore::new(10);
        assert_eq!(
            more_hint(10, 25, &pages),
            "Mostrando 10 de 25. Use --page 2 para carregar mais."
        );
        assert_eq!(more_hint(7, 7, &pages), "Mostrando 7 de 7.");
    }

    #[test]
    fn plain_rendering_has_no_escape_codes() {
        let people = vec![Person {
            id: 1,
            name: "Ana".to_string(),
            age: 30,
        }];
        let out = Renderer::new(false).people(&people, 1, &LoadMore::new(10));
        assert!(out.contains("Ana"));
        assert!(!out.contains('\u{1b}'));
    }

    #[test]
    fn dashboard_reports_risk_and_mismatches() {
        let totals = Totals {
            grand: GrandTotal::new(MoneyCents::new(10_000), MoneyCents::new(4_000)),
            per_person: vec![PersonTotal {
                person_id: 1,
                name: "Ana".to_string(),
                total_income: MoneyCents::new(10_000),
                total_expense: MoneyCents::new(4_000),
                balance: MoneyCents::new(6_000),
            }],
        };
        let mismatch = TotalsMismatch::Grand {
            field: TotalField::Expense,
            local: MoneyCents::new(4_000),
            remote: MoneyCents::new(4_100),
        };

        let out = Renderer::new(false).dashboard(&totals, &[], &[mismatch]);
        assert!(out.contains("40,00% ESTÁVEL"));
        assert!(out.contains("Nenhuma conta pendente."));
        assert!(out.contains("1 divergência(s)"));
        assert!(out.contains("servidor R$ 41,00"));
    }
}
