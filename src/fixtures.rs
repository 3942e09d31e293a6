//! Mock ticket dataset and fixture loading.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::CoreDeskError;
use crate::models::{Priority, Ticket, TicketStatus};

struct MockTicket {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    priority: Priority,
    status: TicketStatus,
    category: &'static str,
    sector_id: &'static str,
    assignee: &'static str,
    requester: &'static str,
    created_at: &'static str,
    updated_at: &'static str,
    responses: u32,
    attachments: u32,
    has_customer_reply: bool,
}

impl From<&MockTicket> for Ticket {
    fn from(mock: &MockTicket) -> Self {
        Ticket {
            id: mock.id.to_string(),
            title: mock.title.to_string(),
            description: mock.description.to_string(),
            priority: mock.priority,
            status: mock.status,
            category: mock.category.to_string(),
            sector_id: mock.sector_id.to_string(),
            assignee: mock.assignee.to_string(),
            requester: mock.requester.to_string(),
            created_at: mock.created_at.to_string(),
            updated_at: mock.updated_at.to_string(),
            responses: mock.responses,
            attachments: mock.attachments,
            has_customer_reply: mock.has_customer_reply,
        }
    }
}

const MOCK_TICKETS: [MockTicket; 8] = [
    MockTicket {
        id: "2024-001",
        title: "Sistema de faturamento fora do ar",
        description: "Ninguém consegue emitir notas fiscais desde a manhã.",
        priority: Priority::Urgent,
        status: TicketStatus::InProgress,
        category: "Sistema",
        sector_id: "suporte-n2",
        assignee: "Carlos Mendes",
        requester: "Maria Silva",
        created_at: "2024-01-15 08:45",
        updated_at: "2024-01-15 10:10",
        responses: 3,
        attachments: 1,
        has_customer_reply: true,
    },
    MockTicket {
        id: "2024-002",
        title: "Erro ao gerar relatório mensal",
        description: "O relatório de vendas trava em 80% da geração.",
        priority: Priority::High,
        status: TicketStatus::New,
        category: "Relatórios",
        sector_id: "desenvolvimento",
        assignee: "",
        requester: "João Pereira",
        created_at: "2024-01-15 09:20",
        updated_at: "2024-01-15 09:20",
        responses: 0,
        attachments: 2,
        has_customer_reply: false,
    },
    MockTicket {
        id: "2024-003",
        title: "Solicitação de novo acesso à VPN",
        description: "Novo colaborador do time comercial precisa de acesso remoto.",
        priority: Priority::Medium,
        status: TicketStatus::Waiting,
        category: "Acesso",
        sector_id: "suporte-n1",
        assignee: "Ana Costa",
        requester: "Fernanda Lima",
        created_at: "2024-01-14 16:05",
        updated_at: "2024-01-15 08:30",
        responses: 2,
        attachments: 0,
        has_customer_reply: true,
    },
    MockTicket {
        id: "2024-004",
        title: "Impressora do financeiro sem toner",
        description: "A impressora do segundo andar exibe aviso de toner vazio.",
        priority: Priority::Low,
        status: TicketStatus::Resolved,
        category: "Hardware",
        sector_id: "suporte-n1",
        assignee: "Ana Costa",
        requester: "Roberto Alves",
        created_at: "2024-01-12 11:00",
        updated_at: "2024-01-13 14:40",
        responses: 1,
        attachments: 0,
        has_customer_reply: false,
    },
    MockTicket {
        id: "2024-005",
        title: "Cobrança duplicada na fatura",
        description: "Cliente relata duas cobranças do mesmo plano em janeiro.",
        priority: Priority::High,
        status: TicketStatus::InProgress,
        category: "Financeiro",
        sector_id: "financeiro",
        assignee: "Patrícia Souza",
        requester: "Maria Silva",
        created_at: "2024-01-13 10:15",
        updated_at: "2024-01-14 17:00",
        responses: 4,
        attachments: 1,
        has_customer_reply: false,
    },
    MockTicket {
        id: "2024-006",
        title: "Lentidão no ERP após atualização",
        description: "Telas de cadastro demoram mais de 30 segundos para abrir.",
        priority: Priority::Urgent,
        status: TicketStatus::New,
        category: "Sistema",
        sector_id: "suporte-n3",
        assignee: "",
        requester: "Lucas Ferreira",
        created_at: "2024-01-15 07:50",
        updated_at: "2024-01-15 07:50",
        responses: 0,
        attachments: 0,
        has_customer_reply: false,
    },
    MockTicket {
        id: "2024-007",
        title: "Dúvida sobre integração via API",
        description: "Parceiro pergunta como autenticar nas rotas de pedidos.",
        priority: Priority::Medium,
        status: TicketStatus::InProgress,
        category: "Integração",
        sector_id: "desenvolvimento",
        assignee: "Rafael Gomes",
        requester: "Beatriz Rocha",
        created_at: "2024-01-14 13:30",
        updated_at: "2024-01-15 09:00",
        responses: 2,
        attachments: 0,
        has_customer_reply: true,
    },
    MockTicket {
        id: "2024-008",
        title: "Troca de senha do e-mail corporativo",
        description: "Usuário bloqueado após tentativas de login inválidas.",
        priority: Priority::High,
        status: TicketStatus::Resolved,
        category: "Acesso",
        sector_id: "suporte-n1",
        assignee: "Carlos Mendes",
        requester: "Fernanda Lima",
        created_at: "2024-01-10 09:00",
        updated_at: "2024-01-10 09:45",
        responses: 2,
        attachments: 0,
        has_customer_reply: false,
    },
];

/// Return the built-in mock ticket collection.
pub fn mock_tickets() -> Vec<Ticket> {
    MOCK_TICKETS.iter().map(Ticket::from).collect()
}

/// Load tickets from a JSON array file.
///
/// # Arguments
/// * `path` - Path to the fixture file.
///
/// # Errors
/// Returns `CoreDeskError::Io` if the file cannot be read and
/// `CoreDeskError::TicketOperation` if it is not a valid ticket array.
pub fn load_tickets(path: &Path) -> Result<Vec<Ticket>, CoreDeskError> {
    let bytes = fs::read(path).map_err(|error| CoreDeskError::Io(error.to_string()))?;
    let tickets: Vec<Ticket> = serde_json::from_slice(&bytes).map_err(|error| {
        CoreDeskError::TicketOperation(format!("ticket file is invalid: {error}"))
    })?;
    debug!(path = %path.display(), count = tickets.len(), "loaded ticket fixtures");
    Ok(tickets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn mock_identifiers_are_unique_and_canonical() {
        let tickets = mock_tickets();
        let mut ids: Vec<&str> = tickets.iter().map(|ticket| ticket.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), tickets.len());
        assert!(ids.iter().all(|id| !id.starts_with('#')));
    }

    #[test]
    fn loads_fixture_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tickets.json");
        fs::write(&path, serde_json::to_string(&mock_tickets()).unwrap()).unwrap();
        assert_eq!(load_tickets(&path).unwrap(), mock_tickets());
    }

    #[test]
    fn rejects_invalid_fixture_file() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("tickets.json");
        fs::write(&path, "{\"id\": 1}").unwrap();
        assert!(matches!(
            load_tickets(&path),
            Err(CoreDeskError::TicketOperation(_))
        ));
    }
}
