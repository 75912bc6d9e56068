//! Mapping of RunningHub application codes to readable error information
//!
//! The table is static and read-only. Messages are the service's own
//! (Chinese) wording. Code 805 (task status error) is refined into
//! sub-codes by inspecting the task's exception message.

use serde::Serialize;

use crate::types::FailedReason;

/// Code reported when a task ended in an abnormal state
pub const CODE_TASK_STATUS_ERROR: i64 = 805;
/// 805 with no recognised cause
pub const SUB_CODE_TASK_STATUS_GENERIC: i64 = 805_000;
/// 805 caused by the content policy filter
pub const SUB_CODE_CONTENT_POLICY: i64 = 805_001;
/// 805 caused by a GPU memory warning
pub const SUB_CODE_GPU_MEMORY: i64 = 805_002;

const CONTENT_POLICY_MARKER: &str = "Porn";
/// The service reports GPU memory exhaustion with this Chinese marker.
const GPU_MEMORY_MARKER: &str = "显存告警";

/// Classified error information
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ErrorInfo {
    pub code: i64,
    pub sign: String,
    pub msg: String,
    pub sub_code: i64,
    pub failed_reason: Option<FailedReason>,
}

struct CodeEntry {
    code: i64,
    sign: &'static str,
    msg: &'static str,
}

const fn entry(code: i64, sign: &'static str, msg: &'static str) -> CodeEntry {
    CodeEntry { code, sign, msg }
}

static ERROR_CODES: &[CodeEntry] = &[
    entry(301, "PARAMS_INVALID", "请求中包含非法或缺失的参数"),
    entry(380, "WORKFLOW_NOT_EXISTS", "指定的工作流不存在"),
    entry(412, "TOKEN_INVALID", "API接口路径拼写错误"),
    entry(415, "TASK_INSTANCE_MAXED", "独占型 API 当前可用的实例/机器数不足"),
    entry(416, "TASK_CREATE_FAILED_BY_NOT_ENOUGH_WALLET", "钱包余额不足"),
    entry(421, "TASK_QUEUE_MAXED", "共享型 API 的并发数已达到用户上限"),
    entry(423, "TASK_NOT_FOUNED", "未找到指定任务"),
    entry(433, "VALIDATE_PROMPT_FAILED", "工作流合法性校验未通过（包含 prompt 与节点配置校验）"),
    entry(435, "TASK_USER_EXCLAPI_INSTANCE_NOT_FOUND", "未找到任务用户API实例"),
    entry(436, "TASK_USER_EXCLAPI_REQUIRED", "独占会员到期"),
    entry(500, "UNKNOWN_ERROR", "未知错误(未被显式捕获的异常)"),
    entry(801, "APIKEY_UNSUPPORTED_FREE_USER", "免费用户不支持 API Key"),
    entry(802, "APIKEY_UNAUTHORIZED", "API Key 未授权/已失效"),
    entry(803, "APIKEY_INVALID_NODE_INFO", "传入的 nodeInfoList 与绑定的工作流不匹配"),
    entry(804, "APIKEY_TASK_IS_RUNNING", "任务正在运行中"),
    entry(805, "APIKEY_TASK_STATUS_ERROR", "任务状态异常"),
    entry(806, "APIKEY_USER_NOT_FOUND", "未找到对应用户"),
    entry(807, "APIKEY_TASK_NOT_FOUND", "未找到对应任务"),
    entry(808, "APIKEY_UPLOAD_FAILED", "文件上传失败"),
    entry(809, "APIKEY_FILE_SIZE_EXCEEDED", "文件大小超出限制"),
    entry(810, "WORKFLOW_NOT_SAVED_OR_NOT_RUNNING", "用户未保存工作流或未在平台运行直接调用api"),
    entry(811, "CORPAPIKEY_INVALID", "企业版 API Key 无效"),
    entry(812, "CORPAPIKEY_INSUFFICIENT_FUNDS", "企业版余额不足"),
    entry(813, "APIKEY_TASK_IS_QUEUED", "任务已排队等待执行"),
    entry(901, "WEBAPP_NOT_EXISTS", "WebApp 不存在"),
];

fn lookup(code: i64) -> Option<&'static CodeEntry> {
    ERROR_CODES.iter().find(|e| e.code == code)
}

/// Returns `true` if `code` has an entry in the static table.
pub fn is_known_code(code: i64) -> bool {
    lookup(code).is_some()
}

/// Classifies `code` with empty caller-supplied sign and message.
pub fn classify(code: i64, failed_reason: Option<&FailedReason>) -> ErrorInfo {
    classify_with(code, String::new(), String::new(), failed_reason)
}

/// Classifies `code`, keeping `sign` and `msg` unless the table or the
/// failure detail provides better ones.
///
/// This never fails: unknown codes without a failure detail come back
/// with the caller's values untouched.
pub fn classify_with(
    code: i64,
    sign: String,
    msg: String,
    failed_reason: Option<&FailedReason>,
) -> ErrorInfo {
    let mut info = ErrorInfo {
        code,
        sign,
        msg,
        sub_code: code,
        failed_reason: failed_reason.cloned(),
    };

    if let Some(entry) = lookup(code) {
        info.sign = entry.sign.to_string();
        info.msg = entry.msg.to_string();
        if code == CODE_TASK_STATUS_ERROR {
            info.sub_code = task_status_sub_code(failed_reason);
        }
        return info;
    }

    if let Some(reason) = failed_reason {
        info.msg = reason.traceback.clone();
        info.sign = reason.exception_message.clone();
    }
    info
}

fn task_status_sub_code(failed_reason: Option<&FailedReason>) -> i64 {
    match failed_reason {
        Some(r) if r.exception_message.contains(CONTENT_POLICY_MARKER) => SUB_CODE_CONTENT_POLICY,
        Some(r) if r.exception_message.contains(GPU_MEMORY_MARKER) => SUB_CODE_GPU_MEMORY,
        _ => SUB_CODE_TASK_STATUS_GENERIC,
    }
}
